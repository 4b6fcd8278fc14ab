// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Per-screen view state: the raw collection, filter values, load status,
//! selection and the pending action.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::mpsc::Sender;

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use crate::action::{ActionFlow, ActionKind, ActionRequest};
use crate::forms::FormPayload;
use crate::view::{CategoryFilter, ItemFilter, ListItem, category_counts, derive_view};
use crate::worker::{WorkerEvent, spawn_fetch, spawn_mutation};
use crate::{CollectionKind, CollectionSnapshot, Record, RecordId};

/// Cooperative cancellation flag shared with a worker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Updated(Record),
    Removed(RecordId),
}

/// Source of collections and the only place mutations happen.
pub trait DataSupplier: Send + Sync {
    fn fetch_collection(
        &self,
        kind: CollectionKind,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot>;

    fn mutate(
        &self,
        target: RecordId,
        action: &ActionKind,
        cancel: &CancelToken,
    ) -> Result<MutationOutcome>;

    fn submit(&self, payload: &FormPayload, _cancel: &CancelToken) -> Result<Record> {
        bail!(
            "{} submissions are not supported here",
            payload.kind().label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier {
    fn notify(&mut self, kind: NoticeKind, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading { request_id: u64 },
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RefreshTicket {
    pub kind: CollectionKind,
    pub request_id: u64,
    pub cancel: CancelToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    pub kind: CollectionKind,
    pub request_id: u64,
    pub target: RecordId,
    pub action: ActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Failed,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ViewController<T: ListItem> {
    source: Vec<T>,
    filters: ItemFilter<T>,
    load: LoadState,
    selection: Option<T::Id>,
    actions: ActionFlow<T::Id>,
    next_request_id: u64,
    in_flight: Option<CancelToken>,
}

impl<T: ListItem> Default for ViewController<T> {
    fn default() -> Self {
        Self {
            source: Vec::new(),
            filters: ItemFilter::<T>::default(),
            load: LoadState::Idle,
            selection: None,
            actions: ActionFlow::default(),
            next_request_id: 0,
            in_flight: None,
        }
    }
}

impl<T: ListItem> ViewController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that starts out `Loaded` with `source`.
    pub fn with_source(source: Vec<T>) -> Self {
        let mut controller = Self {
            source,
            load: LoadState::Loaded,
            ..Self::default()
        };
        controller.reconcile_selection();
        controller
    }

    pub const fn kind(&self) -> CollectionKind {
        T::COLLECTION
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn filters(&self) -> &ItemFilter<T> {
        &self.filters
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn view(&self) -> Vec<&T> {
        derive_view(&self.source, &self.filters)
    }

    pub fn category_counts(&self) -> Vec<(T::Category, usize)> {
        category_counts(&self.source)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
        self.reconcile_selection();
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter<T::Category>) {
        self.filters.category = category;
        self.reconcile_selection();
    }

    /// Unknown values select everything.
    pub fn set_category_raw(&mut self, raw: &str) {
        self.set_category_filter(CategoryFilter::parse_or_all(raw));
    }

    pub fn cycle_category(&mut self) {
        let next = self.filters.category.next();
        self.set_category_filter(next);
    }

    pub fn cycle_sort(&mut self) {
        self.filters.cycle_sort();
    }

    pub fn flip_sort_direction(&mut self) {
        self.filters.flip_sort_direction();
    }

    pub fn selected_id(&self) -> Option<T::Id> {
        self.selection
    }

    pub fn selected(&self) -> Option<&T> {
        let id = self.selection?;
        self.source.iter().find(|item| item.id() == id)
    }

    /// Selects `id` when it is present in the source.
    pub fn select(&mut self, id: T::Id) -> bool {
        if self.source.iter().any(|item| item.id() == id) {
            self.selection = Some(id);
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.move_selection(-1);
    }

    fn move_selection(&mut self, delta: isize) {
        let ids = self
            .view()
            .into_iter()
            .map(|item| item.id())
            .collect::<Vec<_>>();
        if ids.is_empty() {
            self.selection = None;
            return;
        }
        let current = self
            .selection
            .and_then(|id| ids.iter().position(|candidate| *candidate == id));
        let next = match current {
            None => 0,
            Some(index) => index
                .saturating_add_signed(delta)
                .min(ids.len().saturating_sub(1)),
        };
        self.selection = ids.get(next).copied();
    }

    /// Keeps the selection inside the derived view, falling back to its first row.
    fn reconcile_selection(&mut self) {
        let (still_visible, first) = {
            let view = self.view();
            let still_visible = self
                .selection
                .is_some_and(|id| view.iter().any(|item| item.id() == id));
            (still_visible, view.first().map(|item| item.id()))
        };
        if !still_visible {
            self.selection = first;
        }
    }

    /// Applies a local edit to one row of the source.
    pub fn update_item(&mut self, id: T::Id, edit: impl FnOnce(&mut T)) -> bool {
        match self.source.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                edit(item);
                true
            }
            None => false,
        }
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        if self.next_request_id == 0 {
            self.next_request_id = 1;
        }
        self.next_request_id
    }

    /// Enters `Loading` with a fresh request id, cancelling any earlier fetch.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        let request_id = self.next_request_id();
        let cancel = CancelToken::new();
        self.in_flight = Some(cancel.clone());
        self.load = LoadState::Loading { request_id };
        debug!(kind = T::COLLECTION.as_str(), request_id, "refresh started");
        RefreshTicket {
            kind: T::COLLECTION,
            request_id,
            cancel,
        }
    }

    /// Applies a fetch result if it belongs to the newest refresh.
    pub fn finish_refresh(
        &mut self,
        request_id: u64,
        result: Result<CollectionSnapshot, String>,
    ) -> RefreshOutcome {
        let current = self.load == LoadState::Loading { request_id };
        if !current {
            warn!(
                kind = T::COLLECTION.as_str(),
                request_id, "discarding stale fetch result"
            );
            return RefreshOutcome::Stale;
        }
        self.in_flight = None;
        let rows = result.and_then(|snapshot| {
            let found = snapshot.kind();
            T::from_snapshot(snapshot).ok_or_else(|| {
                format!(
                    "expected {} but the supplier returned {}",
                    T::COLLECTION.as_str(),
                    found.as_str()
                )
            })
        });
        match rows {
            Ok(rows) => {
                debug!(
                    kind = T::COLLECTION.as_str(),
                    request_id,
                    rows = rows.len(),
                    "refresh loaded"
                );
                self.source = rows;
                self.load = LoadState::Loaded;
                self.reconcile_selection();
                RefreshOutcome::Applied
            }
            Err(message) => {
                debug!(
                    kind = T::COLLECTION.as_str(),
                    request_id,
                    error = %message,
                    "refresh failed"
                );
                self.load = LoadState::Failed(message);
                RefreshOutcome::Failed
            }
        }
    }

    /// Starts a fetch on a worker thread; the result arrives on `tx`.
    pub fn refresh(&mut self, supplier: Arc<dyn DataSupplier>, tx: Sender<WorkerEvent>) -> u64 {
        let ticket = self.begin_refresh();
        let request_id = ticket.request_id;
        spawn_fetch(supplier, ticket, tx);
        request_id
    }

    pub fn request_action(
        &mut self,
        target: T::Id,
        kind: ActionKind,
    ) -> Result<&ActionRequest<T::Id>> {
        if !kind.applies_to(T::COLLECTION) {
            bail!(
                "cannot {} a {} -- pick a different action",
                kind.label(),
                T::COLLECTION.noun()
            );
        }
        if !self.source.iter().any(|item| item.id() == target) {
            bail!(
                "{} {target:?} no longer exists -- refresh and try again",
                T::COLLECTION.noun()
            );
        }
        debug!(
            kind = T::COLLECTION.as_str(),
            action = kind.label(),
            "action requested"
        );
        self.actions.request(target, kind)
    }

    pub fn pending_action(&self) -> Option<&ActionRequest<T::Id>> {
        self.actions.pending()
    }

    pub fn running_action(&self) -> Option<&ActionRequest<T::Id>> {
        self.actions.running()
    }

    /// Confirmation prompt for the pending action, naming its target.
    pub fn pending_prompt(&self) -> Option<String> {
        let request = self.actions.pending()?;
        let label = self
            .source
            .iter()
            .find(|item| item.id() == request.target_id)
            .map_or_else(
                || T::COLLECTION.noun().to_owned(),
                |item| item.display_label().to_owned(),
            );
        Some(request.kind.prompt(&label))
    }

    /// Drops the pending action without touching the collection.
    pub fn cancel_action(&mut self) -> bool {
        let cancelled = self.actions.cancel();
        if let Some(request) = &cancelled {
            debug!(
                kind = T::COLLECTION.as_str(),
                action = request.kind.label(),
                "action cancelled"
            );
        }
        cancelled.is_some()
    }

    pub fn begin_confirm(&mut self) -> Result<MutationTicket> {
        let request = self.actions.confirm()?;
        debug!(
            kind = T::COLLECTION.as_str(),
            request_id = request.request_id,
            action = request.kind.label(),
            "action confirmed"
        );
        Ok(MutationTicket {
            kind: T::COLLECTION,
            request_id: request.request_id,
            target: request.target_id.into(),
            action: request.kind,
        })
    }

    /// Runs the pending action on a worker thread.
    pub fn confirm_action(
        &mut self,
        supplier: Arc<dyn DataSupplier>,
        tx: Sender<WorkerEvent>,
    ) -> Result<u64> {
        let ticket = self.begin_confirm()?;
        let request_id = ticket.request_id;
        spawn_mutation(supplier, ticket, tx);
        Ok(request_id)
    }

    /// Applies a mutation result and emits exactly one notice. Results for
    /// anything other than the running request are ignored.
    pub fn finish_action(
        &mut self,
        request_id: u64,
        result: Result<MutationOutcome, String>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let Some(request) = self.actions.finish(request_id) else {
            warn!(
                kind = T::COLLECTION.as_str(),
                request_id, "discarding stale mutation result"
            );
            return false;
        };
        let applied = result.and_then(|outcome| self.apply_outcome(outcome));
        match applied {
            Ok(()) => {
                info!(
                    kind = T::COLLECTION.as_str(),
                    action = request.kind.label(),
                    "mutation applied"
                );
                notifier.notify(NoticeKind::Success, request.kind.success_notice());
                self.reconcile_selection();
                true
            }
            Err(message) => {
                warn!(
                    kind = T::COLLECTION.as_str(),
                    action = request.kind.label(),
                    error = %message,
                    "mutation failed"
                );
                notifier.notify(NoticeKind::Error, request.kind.failure_notice());
                false
            }
        }
    }

    fn apply_outcome(&mut self, outcome: MutationOutcome) -> Result<(), String> {
        match outcome {
            MutationOutcome::Updated(record) => {
                let item = T::from_record(record).ok_or_else(|| {
                    format!(
                        "supplier returned a record that is not a {}",
                        T::COLLECTION.noun()
                    )
                })?;
                let id = item.id();
                match self.source.iter_mut().find(|existing| existing.id() == id) {
                    Some(existing) => *existing = item,
                    None => self.source.push(item),
                }
                Ok(())
            }
            MutationOutcome::Removed(removed) => {
                self.source.retain(|item| {
                    let id: RecordId = item.id().into();
                    id != removed
                });
                Ok(())
            }
        }
    }
}
