// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Test doubles for the data supplier and the notification sink.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow, bail};
use mealjoin_app::{
    ActionKind, CancelToken, CollectionKind, CollectionSnapshot, DataSupplier, FormPayload,
    MutationOutcome, NoticeKind, Notifier, Record, RecordId,
};

/// Upper bound on how long a gated call waits before giving up, so a broken
/// test fails instead of hanging.
const GATE_TIMEOUT: Duration = Duration::from_secs(10);
const SLEEP_SLICE: Duration = Duration::from_millis(5);

fn empty_snapshot(kind: CollectionKind) -> CollectionSnapshot {
    match kind {
        CollectionKind::Meals => CollectionSnapshot::Meals(Vec::new()),
        CollectionKind::Users => CollectionSnapshot::Users(Vec::new()),
        CollectionKind::Sessions => CollectionSnapshot::Sessions(Vec::new()),
        CollectionKind::Reports => CollectionSnapshot::Reports(Vec::new()),
        CollectionKind::Conversations => CollectionSnapshot::Conversations(Vec::new()),
        CollectionKind::Bookings => CollectionSnapshot::Bookings(Vec::new()),
    }
}

#[derive(Debug)]
struct GatedCall {
    kind: CollectionKind,
    cancel: CancelToken,
    release: Option<Result<CollectionSnapshot, String>>,
    released: bool,
}

#[derive(Debug, Default)]
struct GateState {
    calls: Vec<GatedCall>,
}

/// Every fetch blocks until the test releases it. Calls are told apart by
/// their cancel token: a superseded refresh has its token cancelled.
#[derive(Debug, Default)]
pub struct GatedSupplier {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl GatedSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, GateState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("gated supplier lock poisoned"))
    }

    /// Blocks until at least `count` fetches are waiting on the gate.
    pub fn wait_for_calls(&self, count: usize) -> Result<()> {
        let deadline = Instant::now() + GATE_TIMEOUT;
        let mut state = self.lock()?;
        while state.calls.len() < count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                bail!("expected {count} gated fetches, saw {}", state.calls.len());
            }
            state = self
                .changed
                .wait_timeout(state, remaining)
                .map_err(|_| anyhow!("gated supplier lock poisoned"))?
                .0;
        }
        Ok(())
    }

    /// Releases the one waiting fetch whose token has not been cancelled.
    pub fn release_live(&self, result: Result<CollectionSnapshot, String>) -> Result<()> {
        self.release_where(|cancel| !cancel.is_cancelled(), result)
    }

    /// Releases the oldest waiting fetch whose token was cancelled.
    pub fn release_superseded(&self, result: Result<CollectionSnapshot, String>) -> Result<()> {
        self.release_where(CancelToken::is_cancelled, result)
    }

    fn release_where(
        &self,
        matches: impl Fn(&CancelToken) -> bool,
        result: Result<CollectionSnapshot, String>,
    ) -> Result<()> {
        let mut state = self.lock()?;
        let call = state
            .calls
            .iter_mut()
            .find(|call| !call.released && matches(&call.cancel))
            .ok_or_else(|| anyhow!("no waiting fetch matches the release"))?;
        call.release = Some(result);
        call.released = true;
        self.changed.notify_all();
        Ok(())
    }
}

impl DataSupplier for GatedSupplier {
    fn fetch_collection(
        &self,
        kind: CollectionKind,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot> {
        let mut state = self.lock()?;
        let index = state.calls.len();
        state.calls.push(GatedCall {
            kind,
            cancel: cancel.clone(),
            release: None,
            released: false,
        });
        self.changed.notify_all();

        let deadline = Instant::now() + GATE_TIMEOUT;
        loop {
            if let Some(call) = state.calls.get_mut(index)
                && let Some(result) = call.release.take()
            {
                // An empty snapshot of the wrong kind is shorthand for "nothing".
                return match result {
                    Ok(snapshot) if snapshot.is_empty() && snapshot.kind() != call.kind => {
                        Ok(empty_snapshot(call.kind))
                    }
                    Ok(snapshot) => Ok(snapshot),
                    Err(message) => Err(anyhow!(message)),
                };
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                bail!("gated fetch for {} was never released", kind.as_str());
            }
            state = self
                .changed
                .wait_timeout(state, remaining)
                .map_err(|_| anyhow!("gated supplier lock poisoned"))?
                .0;
        }
    }

    fn mutate(
        &self,
        _target: RecordId,
        action: &ActionKind,
        _cancel: &CancelToken,
    ) -> Result<MutationOutcome> {
        bail!("gated supplier only serves fetches, not {}", action.label())
    }
}

/// Fixed snapshots with a per-call latency and optional failures.
#[derive(Debug, Default)]
pub struct ScriptedSupplier {
    snapshots: Vec<CollectionSnapshot>,
    latency: Duration,
    fetch_failure: Option<String>,
    mutations: Mutex<VecDeque<Result<MutationOutcome, String>>>,
    mutation_log: Mutex<Vec<(RecordId, ActionKind)>>,
    submissions: Mutex<VecDeque<Result<Record, String>>>,
    submission_log: Mutex<Vec<FormPayload>>,
    fetches: AtomicUsize,
}

impl ScriptedSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_snapshot(mut self, snapshot: CollectionSnapshot) -> Self {
        self.snapshots
            .retain(|existing| existing.kind() != snapshot.kind());
        self.snapshots.push(snapshot);
        self
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn failing_fetches(mut self, message: impl Into<String>) -> Self {
        self.fetch_failure = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_mutation(self, result: Result<MutationOutcome, String>) -> Self {
        if let Ok(mut queue) = self.mutations.lock() {
            queue.push_back(result);
        }
        self
    }

    #[must_use]
    pub fn with_submission(self, result: Result<Record, String>) -> Self {
        if let Ok(mut queue) = self.submissions.lock() {
            queue.push_back(result);
        }
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn mutation_log(&self) -> Vec<(RecordId, ActionKind)> {
        self.mutation_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn submission_log(&self) -> Vec<FormPayload> {
        self.submission_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn wait(&self, cancel: &CancelToken) -> Result<()> {
        let deadline = Instant::now() + self.latency;
        while Instant::now() < deadline {
            if cancel.is_cancelled() {
                bail!("request cancelled");
            }
            thread::sleep(SLEEP_SLICE.min(deadline.saturating_duration_since(Instant::now())));
        }
        Ok(())
    }
}

impl DataSupplier for ScriptedSupplier {
    fn fetch_collection(
        &self,
        kind: CollectionKind,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.wait(cancel)?;
        if let Some(message) = &self.fetch_failure {
            bail!("{message}");
        }
        Ok(self
            .snapshots
            .iter()
            .find(|snapshot| snapshot.kind() == kind)
            .cloned()
            .unwrap_or_else(|| empty_snapshot(kind)))
    }

    fn mutate(
        &self,
        target: RecordId,
        action: &ActionKind,
        cancel: &CancelToken,
    ) -> Result<MutationOutcome> {
        self.wait(cancel)?;
        self.mutation_log
            .lock()
            .map_err(|_| anyhow!("mutation log lock poisoned"))?
            .push((target, action.clone()));
        let next = self
            .mutations
            .lock()
            .map_err(|_| anyhow!("mutation queue lock poisoned"))?
            .pop_front();
        match next {
            Some(result) => result.map_err(|message| anyhow!(message)),
            None => bail!("no scripted mutation outcome"),
        }
    }

    fn submit(&self, payload: &FormPayload, cancel: &CancelToken) -> Result<Record> {
        self.wait(cancel)?;
        self.submission_log
            .lock()
            .map_err(|_| anyhow!("submission log lock poisoned"))?
            .push(payload.clone());
        let next = self
            .submissions
            .lock()
            .map_err(|_| anyhow!("submission queue lock poisoned"))?
            .pop_front();
        match next {
            Some(result) => result.map_err(|message| anyhow!(message)),
            None => bail!("{} submissions are closed", payload.kind().label()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNotifier {
    notices: Vec<(NoticeKind, String)>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[(NoticeKind, String)] {
        &self.notices
    }

    pub fn successes(&self) -> Vec<&str> {
        self.of_kind(NoticeKind::Success)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.of_kind(NoticeKind::Error)
    }

    fn of_kind(&self, kind: NoticeKind) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(notice, _)| *notice == kind)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.notices.push((kind, message.to_owned()));
    }
}
