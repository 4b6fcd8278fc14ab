// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::controller::{
    CancelToken, DataSupplier, MutationOutcome, MutationTicket, RefreshTicket,
};
use crate::forms::{FormKind, FormPayload};
use crate::{CollectionKind, CollectionSnapshot, Record};

/// Results delivered from worker threads back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Fetched {
        kind: CollectionKind,
        request_id: u64,
        result: Result<CollectionSnapshot, String>,
    },
    Mutated {
        kind: CollectionKind,
        request_id: u64,
        result: Result<MutationOutcome, String>,
    },
    Submitted {
        form: FormKind,
        request_id: u64,
        result: Result<Record, String>,
    },
}

impl WorkerEvent {
    pub const fn request_id(&self) -> u64 {
        match self {
            Self::Fetched { request_id, .. }
            | Self::Mutated { request_id, .. }
            | Self::Submitted { request_id, .. } => *request_id,
        }
    }
}

pub fn spawn_fetch(
    supplier: Arc<dyn DataSupplier>,
    ticket: RefreshTicket,
    tx: Sender<WorkerEvent>,
) {
    thread::spawn(move || {
        let result = supplier
            .fetch_collection(ticket.kind, &ticket.cancel)
            .map_err(|error| format!("{error:#}"));
        debug!(
            kind = ticket.kind.as_str(),
            request_id = ticket.request_id,
            ok = result.is_ok(),
            "fetch finished"
        );
        // The receiver is gone once the UI has shut down.
        let _ = tx.send(WorkerEvent::Fetched {
            kind: ticket.kind,
            request_id: ticket.request_id,
            result,
        });
    });
}

pub fn spawn_mutation(
    supplier: Arc<dyn DataSupplier>,
    ticket: MutationTicket,
    tx: Sender<WorkerEvent>,
) {
    thread::spawn(move || {
        let cancel = CancelToken::new();
        let result = supplier
            .mutate(ticket.target, &ticket.action, &cancel)
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(WorkerEvent::Mutated {
            kind: ticket.kind,
            request_id: ticket.request_id,
            result,
        });
    });
}

pub fn spawn_submit(
    supplier: Arc<dyn DataSupplier>,
    payload: FormPayload,
    request_id: u64,
    tx: Sender<WorkerEvent>,
) {
    thread::spawn(move || {
        let cancel = CancelToken::new();
        let result = supplier
            .submit(&payload, &cancel)
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(WorkerEvent::Submitted {
            form: payload.kind(),
            request_id,
            result,
        });
    });
}
