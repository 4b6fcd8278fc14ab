// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use mealjoin_app::validation::{
    format_clock_time, format_compact_pesewas, format_date, format_pesewas,
};
use mealjoin_app::{
    Access, ActionKind, AdminSession, AppCommand, AppEvent, AppState, Booking, BookingPhase,
    CategoryFilter, CollectionKind, CollectionSnapshot, Conversation, DataSupplier, DraftProgress,
    FilterValue, FormDraft, FormKind, FormOutput, FormPayload, ListItem, LoadState, Meal,
    MealSession, MutationOutcome, NoticeKind, Notifier, Record, RefreshOutcome, Report, Route,
    User, UserSession, UserStatus, ViewController, WorkerEvent, admin_stats, booking_total,
    cook_stats, spawn_submit,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use tracing::{debug, info, warn};

const APP_TITLE: &str = "mealjoin";
const DEFAULT_TOAST: Duration = Duration::from_secs(4);
const UNREAD_MARK: &str = "●";

/// What the terminal front-end needs from its host process.
pub trait AppRuntime {
    fn supplier(&self) -> Arc<dyn DataSupplier>;
    fn today(&self) -> Date;
    fn toast_duration(&self) -> Duration {
        DEFAULT_TOAST
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Senders handed to key handlers: one for UI timers, one for worker threads.
#[derive(Debug, Clone)]
struct Channels {
    internal: Sender<InternalEvent>,
    worker: Sender<WorkerEvent>,
}

/// Object-safe view of a `ViewController` so key handling can address the
/// active screen without knowing its record type.
trait ListScreen {
    fn load_state(&self) -> &LoadState;
    fn search_term(&self) -> &str;
    fn set_search_term(&mut self, term: String);
    fn cycle_category(&mut self);
    fn cycle_sort(&mut self);
    fn flip_sort_direction(&mut self);
    fn select_next(&mut self);
    fn select_prev(&mut self);
    fn filter_summary(&self) -> String;
    fn refresh(&mut self, supplier: Arc<dyn DataSupplier>, tx: Sender<WorkerEvent>) -> u64;
    fn finish_refresh(
        &mut self,
        request_id: u64,
        result: Result<CollectionSnapshot, String>,
    ) -> RefreshOutcome;
    fn pending_prompt(&self) -> Option<String>;
    fn cancel_action(&mut self) -> bool;
    fn confirm_action(&mut self, supplier: Arc<dyn DataSupplier>, tx: Sender<WorkerEvent>)
    -> Result<u64>;
    fn finish_action(
        &mut self,
        request_id: u64,
        result: Result<MutationOutcome, String>,
        notifier: &mut dyn Notifier,
    ) -> bool;
}

impl<T: ListItem> ListScreen for ViewController<T> {
    fn load_state(&self) -> &LoadState {
        ViewController::load_state(self)
    }

    fn search_term(&self) -> &str {
        &self.filters().search_term
    }

    fn set_search_term(&mut self, term: String) {
        ViewController::set_search_term(self, term);
    }

    fn cycle_category(&mut self) {
        ViewController::cycle_category(self);
    }

    fn cycle_sort(&mut self) {
        ViewController::cycle_sort(self);
    }

    fn flip_sort_direction(&mut self) {
        ViewController::flip_sort_direction(self);
    }

    fn select_next(&mut self) {
        ViewController::select_next(self);
    }

    fn select_prev(&mut self) {
        ViewController::select_prev(self);
    }

    fn filter_summary(&self) -> String {
        let filters = self.filters();
        let mut parts = Vec::new();
        if !filters.search_term.is_empty() {
            parts.push(format!("search: {}", filters.search_term));
        }
        if filters.category != CategoryFilter::All {
            parts.push(format!("filter: {}", filters.category.as_str()));
        }
        if let Some(spec) = filters.sort {
            parts.push(format!(
                "sort: {} {}",
                spec.key.as_str(),
                spec.direction.as_str()
            ));
        }
        parts.join(" | ")
    }

    fn refresh(&mut self, supplier: Arc<dyn DataSupplier>, tx: Sender<WorkerEvent>) -> u64 {
        ViewController::refresh(self, supplier, tx)
    }

    fn finish_refresh(
        &mut self,
        request_id: u64,
        result: Result<CollectionSnapshot, String>,
    ) -> RefreshOutcome {
        ViewController::finish_refresh(self, request_id, result)
    }

    fn pending_prompt(&self) -> Option<String> {
        ViewController::pending_prompt(self)
    }

    fn cancel_action(&mut self) -> bool {
        ViewController::cancel_action(self)
    }

    fn confirm_action(
        &mut self,
        supplier: Arc<dyn DataSupplier>,
        tx: Sender<WorkerEvent>,
    ) -> Result<u64> {
        ViewController::confirm_action(self, supplier, tx)
    }

    fn finish_action(
        &mut self,
        request_id: u64,
        result: Result<MutationOutcome, String>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        ViewController::finish_action(self, request_id, result, notifier)
    }
}

/// Column layout for one record type, shared by the list screens and the
/// one-shot listing.
pub trait TableRows: ListItem {
    const HEADERS: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRows for Meal {
    const HEADERS: &'static [&'static str] = &[
        "Meal", "Host", "Category", "Price", "Time", "Rating", "Spots", "Location",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.host_name.clone(),
            self.category.label().to_owned(),
            format_pesewas(self.price_pesewas),
            format_clock_time(self.time),
            format!("{:.1} ({})", self.rating, self.reviews),
            self.spots_left.to_string(),
            self.location.clone(),
        ]
    }
}

impl TableRows for User {
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Joined", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            format_date(self.join_date),
            self.status.as_str().to_owned(),
        ]
    }
}

impl TableRows for MealSession {
    const HEADERS: &'static [&'static str] =
        &["Event", "Host", "Date", "Time", "Guests", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.event_title.clone(),
            self.host_name.clone(),
            format_date(self.date),
            format_clock_time(self.time),
            format!("{}/{}", self.attendees, self.max_attendees),
            self.status.as_str().to_owned(),
        ]
    }
}

impl TableRows for Report {
    const HEADERS: &'static [&'static str] = &[
        "Reporter", "Reported", "Event", "Reason", "Reported on", "Status",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.reporter_name.clone(),
            self.reported_user.clone(),
            self.reported_event
                .clone()
                .unwrap_or_else(|| "-".to_owned()),
            self.reason.clone(),
            format_date(self.date_reported),
            self.status.as_str().to_owned(),
        ]
    }
}

impl TableRows for Conversation {
    const HEADERS: &'static [&'static str] = &["", "Name", "Last message", "When"];

    fn cells(&self) -> Vec<String> {
        vec![
            if self.unread { UNREAD_MARK } else { "" }.to_owned(),
            self.name.clone(),
            self.last_message.clone(),
            self.time.clone(),
        ]
    }
}

impl TableRows for Booking {
    const HEADERS: &'static [&'static str] = &[
        "Guest", "Meal", "Date", "Time", "Guests", "Amount", "Status", "Reference",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.guest_name.clone(),
            self.meal_title.clone(),
            format_date(self.date),
            format_clock_time(self.time),
            self.guests.to_string(),
            format_pesewas(self.amount_pesewas),
            self.status.as_str().to_owned(),
            self.reference.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default)]
struct Screens {
    meals: ViewController<Meal>,
    conversations: ViewController<Conversation>,
    bookings: ViewController<Booking>,
    users: ViewController<User>,
    sessions: ViewController<MealSession>,
    reports: ViewController<Report>,
}

impl Screens {
    fn get(&self, kind: CollectionKind) -> &dyn ListScreen {
        match kind {
            CollectionKind::Meals => &self.meals,
            CollectionKind::Users => &self.users,
            CollectionKind::Sessions => &self.sessions,
            CollectionKind::Reports => &self.reports,
            CollectionKind::Conversations => &self.conversations,
            CollectionKind::Bookings => &self.bookings,
        }
    }

    fn get_mut(&mut self, kind: CollectionKind) -> &mut dyn ListScreen {
        match kind {
            CollectionKind::Meals => &mut self.meals,
            CollectionKind::Users => &mut self.users,
            CollectionKind::Sessions => &mut self.sessions,
            CollectionKind::Reports => &mut self.reports,
            CollectionKind::Conversations => &mut self.conversations,
            CollectionKind::Bookings => &mut self.bookings,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum InputMode {
    #[default]
    Nav,
    Search,
    Reply(String),
}

#[derive(Debug, Clone, PartialEq)]
struct FormOverlay {
    draft: FormDraft,
    phase: BookingPhase,
}

impl FormOverlay {
    fn new(draft: FormDraft) -> Self {
        Self {
            draft,
            phase: BookingPhase::Editing,
        }
    }
}

#[derive(Debug, Default)]
struct NoticeBuffer(Vec<(NoticeKind, String)>);

impl Notifier for NoticeBuffer {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.0.push((kind, message.to_owned()));
    }
}

#[derive(Debug, Clone)]
struct ViewData {
    screens: Screens,
    user: UserSession,
    admin: AdminSession,
    input: InputMode,
    form: Option<FormOverlay>,
    tab_anchor: Route,
    fallback: Route,
    next_submit_id: u64,
    status_token: u64,
    help_visible: bool,
    today: Date,
    toast: Duration,
}

impl ViewData {
    fn new(today: Date, toast: Duration) -> Self {
        Self {
            screens: Screens::default(),
            user: UserSession::default(),
            admin: AdminSession::default(),
            input: InputMode::Nav,
            form: None,
            tab_anchor: Route::FindMeal,
            fallback: Route::FindMeal,
            next_submit_id: 0,
            status_token: 0,
            help_visible: false,
            today,
            toast,
        }
    }

    fn access(&self) -> Access {
        Access::from_sessions(&self.user, &self.admin)
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(runtime.today(), runtime.toast_duration());
    let (internal_tx, internal_rx) = mpsc::channel();
    let (worker_tx, worker_rx) = mpsc::channel();
    let channels = Channels {
        internal: internal_tx,
        worker: worker_tx,
    };

    let start = state.route;
    navigate(state, runtime, &mut view_data, &channels, start);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);
        process_worker_events(state, runtime, &mut view_data, &channels, &worker_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &channels, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus, view_data.access());
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn process_worker_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    rx: &Receiver<WorkerEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_worker_event(state, runtime, view_data, channels, event);
    }
}

/// Routes a worker result to the screen that asked for it. Each controller
/// drops results for requests it no longer waits on.
fn handle_worker_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    event: WorkerEvent,
) {
    match event {
        WorkerEvent::Fetched {
            kind,
            request_id,
            result,
        } => {
            let error = result.as_ref().err().cloned();
            let outcome = view_data
                .screens
                .get_mut(kind)
                .finish_refresh(request_id, result);
            if outcome == RefreshOutcome::Failed
                && let Some(error) = error
            {
                emit_status(
                    state,
                    view_data,
                    &channels.internal,
                    format!("{error} -- press r to retry"),
                );
            }
        }
        WorkerEvent::Mutated {
            kind,
            request_id,
            result,
        } => {
            let mut notices = NoticeBuffer::default();
            view_data
                .screens
                .get_mut(kind)
                .finish_action(request_id, result, &mut notices);
            for (_, message) in notices.0 {
                emit_status(state, view_data, &channels.internal, message);
            }
        }
        WorkerEvent::Submitted {
            form,
            request_id,
            result,
        } => finish_submission(
            state,
            runtime,
            view_data,
            channels,
            form,
            request_id,
            result,
        ),
    }
}

fn finish_submission<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    form: FormKind,
    request_id: u64,
    result: Result<Record, String>,
) {
    let Some(overlay) = view_data.form.as_mut() else {
        warn!(
            form = form.label(),
            request_id,
            "submission finished after its form closed"
        );
        return;
    };
    if overlay.phase != (BookingPhase::Processing { request_id }) {
        warn!(
            form = form.label(),
            request_id,
            "discarding stale submission result"
        );
        return;
    }

    match (form, result) {
        (FormKind::Booking, Ok(Record::Booking(booking))) => {
            info!(reference = %booking.reference, "booking confirmed");
            overlay.phase = BookingPhase::Complete {
                reference: booking.reference,
                total_pesewas: booking.amount_pesewas,
            };
            refresh_kinds(
                runtime,
                view_data,
                channels,
                &[CollectionKind::Meals, CollectionKind::Bookings],
            );
        }
        (FormKind::Booking, Ok(other)) => {
            overlay.phase = BookingPhase::Failed(format!(
                "unexpected {} record from booking",
                other.kind().noun()
            ));
        }
        (FormKind::Booking, Err(message)) => {
            overlay.phase = BookingPhase::Failed(message.clone());
            emit_status(
                state,
                view_data,
                &channels.internal,
                format!("Payment failed: {message}"),
            );
        }
        (_, Ok(record)) => {
            view_data.form = None;
            let notice = match form {
                FormKind::CreateMeal => "Meal created successfully",
                FormKind::Complaint => "Complaint submitted. We'll get back to you soon.",
                _ => "Saved",
            };
            emit_status(state, view_data, &channels.internal, notice);
            refresh_kinds(runtime, view_data, channels, &[record.kind()]);
            let back = view_data.fallback;
            navigate(state, runtime, view_data, channels, back);
        }
        (_, Err(message)) => {
            overlay.phase = BookingPhase::Editing;
            emit_status(
                state,
                view_data,
                &channels.internal,
                format!("{} failed: {message}", form.label()),
            );
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()), view_data.access());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token, view_data.toast);
}

/// Collections a route reads from.
fn collections_for(route: Route) -> &'static [CollectionKind] {
    match route {
        Route::FindMeal | Route::MealDetails(_) | Route::Booking(_) => &[CollectionKind::Meals],
        Route::Messages => &[CollectionKind::Conversations],
        Route::CookDashboard => &[CollectionKind::Bookings, CollectionKind::Meals],
        Route::AdminDashboard => &[
            CollectionKind::Users,
            CollectionKind::Sessions,
            CollectionKind::Meals,
            CollectionKind::Reports,
        ],
        Route::AdminUsers => &[CollectionKind::Users],
        Route::AdminSessions => &[CollectionKind::Sessions],
        Route::AdminReports => &[CollectionKind::Reports],
        _ => &[],
    }
}

/// The list that search, filter, sort and selection keys act on.
fn list_kind(route: Route) -> Option<CollectionKind> {
    match route {
        Route::FindMeal => Some(CollectionKind::Meals),
        Route::Messages => Some(CollectionKind::Conversations),
        Route::CookDashboard => Some(CollectionKind::Bookings),
        Route::AdminUsers => Some(CollectionKind::Users),
        Route::AdminSessions => Some(CollectionKind::Sessions),
        Route::AdminReports => Some(CollectionKind::Reports),
        _ => None,
    }
}

fn refresh_kinds<R: AppRuntime>(
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    kinds: &[CollectionKind],
) {
    for kind in kinds {
        view_data
            .screens
            .get_mut(*kind)
            .refresh(runtime.supplier(), channels.worker.clone());
    }
}

fn ensure_loaded<R: AppRuntime>(
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    route: Route,
) {
    let idle = collections_for(route)
        .iter()
        .copied()
        .filter(|kind| *view_data.screens.get(*kind).load_state() == LoadState::Idle)
        .collect::<Vec<_>>();
    refresh_kinds(runtime, view_data, channels, &idle);
}

fn navigate<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    route: Route,
) {
    let events = state.dispatch(AppCommand::Navigate(route), view_data.access());
    apply_route_events(state, runtime, view_data, channels, events);
}

fn apply_route_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    events: Vec<AppEvent>,
) {
    for event in events {
        match event {
            AppEvent::Redirected { from, to } => {
                debug!(from = %from.path(), to = %to.path(), "route redirected");
                if Route::TABS.contains(&from) {
                    view_data.tab_anchor = from;
                }
            }
            AppEvent::RouteChanged(route) => {
                enter_route(state, runtime, view_data, channels, route)
            }
            AppEvent::StatusUpdated(_) | AppEvent::StatusCleared => {}
        }
    }
}

fn enter_route<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    route: Route,
) {
    if Route::TABS.contains(&route) {
        view_data.tab_anchor = route;
        view_data.fallback = route;
    }
    view_data.input = InputMode::Nav;
    match route {
        Route::SignIn => view_data.form = Some(FormOverlay::new(FormDraft::sign_in())),
        Route::AdminLogin => view_data.form = Some(FormOverlay::new(FormDraft::admin_login())),
        Route::Complaint => view_data.form = Some(FormOverlay::new(FormDraft::complaint())),
        Route::CreateMeal => {
            let host = view_data
                .user
                .user()
                .map(|user| user.name.clone())
                .unwrap_or_default();
            view_data.form = Some(FormOverlay::new(FormDraft::create_meal(host)));
        }
        Route::Booking(meal_id) => {
            let meal = view_data
                .screens
                .meals
                .source()
                .iter()
                .find(|meal| meal.id == meal_id)
                .cloned();
            match meal {
                Some(meal) if meal.spots_left == 0 => {
                    emit_status(
                        state,
                        view_data,
                        &channels.internal,
                        "This meal is fully booked",
                    );
                }
                Some(meal) => {
                    view_data.form = Some(FormOverlay::new(FormDraft::booking(meal)));
                }
                None => emit_status(
                    state,
                    view_data,
                    &channels.internal,
                    format!("meal {meal_id} is not loaded -- refresh and try again"),
                ),
            }
        }
        _ => {}
    }
    ensure_loaded(runtime, view_data, channels, route);
}

/// Tab rotation from the last requested tab, so a redirect to a login page
/// does not reset the position.
fn rotate_tab<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    delta: isize,
) {
    let command = if state.active_tab().is_some() {
        if delta > 0 {
            AppCommand::NextTab
        } else {
            AppCommand::PrevTab
        }
    } else {
        let tabs = Route::TABS;
        let current = tabs
            .iter()
            .position(|tab| *tab == view_data.tab_anchor)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        AppCommand::Navigate(tabs[next])
    };
    let events = state.dispatch(command, view_data.access());
    apply_route_events(state, runtime, view_data, channels, events);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }
    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }
    if view_data.form.is_some() {
        handle_form_key(state, runtime, view_data, channels, key);
        return false;
    }
    if let Some(kind) = list_kind(state.route)
        && view_data.screens.get(kind).pending_prompt().is_some()
    {
        handle_confirm_key(state, runtime, view_data, channels, kind, key);
        return false;
    }
    match view_data.input {
        InputMode::Search => handle_search_key(view_data, state.route, key),
        InputMode::Reply(_) => handle_reply_key(state, runtime, view_data, channels, key),
        InputMode::Nav => handle_nav_key(state, runtime, view_data, channels, key),
    }
    false
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    key: KeyEvent,
) {
    let route = state.route;
    let list = list_kind(route);
    match key.code {
        KeyCode::Tab => rotate_tab(state, runtime, view_data, channels, 1),
        KeyCode::BackTab => rotate_tab(state, runtime, view_data, channels, -1),
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char('L') => toggle_login(state, runtime, view_data, channels),
        KeyCode::Char('c') => navigate(state, runtime, view_data, channels, Route::Complaint),
        KeyCode::Char('p') => navigate(state, runtime, view_data, channels, Route::Profile),
        KeyCode::Char('r') => {
            refresh_kinds(runtime, view_data, channels, collections_for(route));
        }
        KeyCode::Char('/') if list.is_some() => view_data.input = InputMode::Search,
        KeyCode::Char('f') => {
            if let Some(kind) = list {
                view_data.screens.get_mut(kind).cycle_category();
            }
        }
        KeyCode::Char('s') => {
            if let Some(kind) = list {
                view_data.screens.get_mut(kind).cycle_sort();
            }
        }
        KeyCode::Char('S') => {
            if let Some(kind) = list {
                view_data.screens.get_mut(kind).flip_sort_direction();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(kind) = list {
                view_data.screens.get_mut(kind).select_next();
                mark_selected_read(view_data, route);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(kind) = list {
                view_data.screens.get_mut(kind).select_prev();
                mark_selected_read(view_data, route);
            }
        }
        KeyCode::Enter => match route {
            Route::FindMeal => {
                if let Some(id) = view_data.screens.meals.selected_id() {
                    navigate(state, runtime, view_data, channels, Route::MealDetails(id));
                }
            }
            Route::Messages if view_data.screens.conversations.selected_id().is_some() => {
                mark_selected_read(view_data, route);
                view_data.input = InputMode::Reply(String::new());
            }
            _ => {}
        },
        KeyCode::Esc => {
            if matches!(route, Route::MealDetails(_)) {
                navigate(state, runtime, view_data, channels, Route::FindMeal);
            }
        }
        KeyCode::Char('b') => {
            let meal_id = match route {
                Route::MealDetails(id) => Some(id),
                Route::FindMeal => view_data.screens.meals.selected_id(),
                _ => None,
            };
            if let Some(id) = meal_id {
                navigate(state, runtime, view_data, channels, Route::Booking(id));
            }
        }
        KeyCode::Char('n') if route == Route::CookDashboard => {
            navigate(state, runtime, view_data, channels, Route::CreateMeal);
        }
        KeyCode::Char('x') if route == Route::AdminUsers => {
            let target = view_data
                .screens
                .users
                .selected()
                .map(|user| (user.id, user.status));
            if let Some((id, status)) = target {
                let action = if status == UserStatus::Active {
                    ActionKind::Suspend
                } else {
                    ActionKind::Activate
                };
                let requested = view_data.screens.users.request_action(id, action).map(drop);
                report_request(state, view_data, channels, requested);
            }
        }
        KeyCode::Char(code @ ('d' | 'D')) if route == Route::AdminSessions => {
            if let Some(id) = view_data.screens.sessions.selected_id() {
                let action = if code == 'd' {
                    ActionKind::Delete
                } else {
                    ActionKind::Deactivate
                };
                let requested = view_data
                    .screens
                    .sessions
                    .request_action(id, action)
                    .map(drop);
                report_request(state, view_data, channels, requested);
            }
        }
        KeyCode::Char('v') if route == Route::AdminReports => {
            if let Some(id) = view_data.screens.reports.selected_id() {
                let requested = view_data
                    .screens
                    .reports
                    .request_action(id, ActionKind::Resolve)
                    .map(drop);
                report_request(state, view_data, channels, requested);
            }
        }
        _ => {}
    }
}

fn report_request(
    state: &mut AppState,
    view_data: &mut ViewData,
    channels: &Channels,
    requested: Result<()>,
) {
    if let Err(error) = requested {
        emit_status(state, view_data, &channels.internal, error.to_string());
    }
}

fn mark_selected_read(view_data: &mut ViewData, route: Route) {
    if route != Route::Messages {
        return;
    }
    let conversations = &mut view_data.screens.conversations;
    if let Some(id) = conversations.selected_id() {
        conversations.update_item(id, |conversation| conversation.unread = false);
    }
}

fn toggle_login<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
) {
    let route = state.route;
    if route.is_admin() || route == Route::AdminLogin {
        if view_data.admin.is_authenticated() {
            view_data.admin.logout();
            emit_status(state, view_data, &channels.internal, "Signed out of admin");
        }
        navigate(state, runtime, view_data, channels, Route::AdminLogin);
        return;
    }
    if view_data.user.is_authenticated() {
        view_data.user.logout();
        emit_status(state, view_data, &channels.internal, "Signed out");
        navigate(state, runtime, view_data, channels, Route::FindMeal);
    } else {
        navigate(state, runtime, view_data, channels, Route::SignIn);
    }
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    kind: CollectionKind,
    key: KeyEvent,
) {
    let screen = view_data.screens.get_mut(kind);
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            let confirmed = screen
                .confirm_action(runtime.supplier(), channels.worker.clone())
                .map(drop);
            report_request(state, view_data, channels, confirmed);
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            screen.cancel_action();
        }
        _ => {}
    }
}

fn handle_search_key(view_data: &mut ViewData, route: Route, key: KeyEvent) {
    let Some(kind) = list_kind(route) else {
        view_data.input = InputMode::Nav;
        return;
    };
    let screen = view_data.screens.get_mut(kind);
    let mut term = screen.search_term().to_owned();
    match key.code {
        KeyCode::Enter => view_data.input = InputMode::Nav,
        KeyCode::Esc => {
            screen.set_search_term(String::new());
            view_data.input = InputMode::Nav;
        }
        KeyCode::Backspace => {
            term.pop();
            screen.set_search_term(term);
        }
        KeyCode::Char(ch) => {
            term.push(ch);
            screen.set_search_term(term);
        }
        _ => {}
    }
}

fn handle_reply_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    key: KeyEvent,
) {
    let InputMode::Reply(buffer) = &mut view_data.input else {
        return;
    };
    match key.code {
        KeyCode::Esc => view_data.input = InputMode::Nav,
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(ch) => buffer.push(ch),
        KeyCode::Enter => {
            let body = buffer.trim().to_owned();
            if body.is_empty() {
                return;
            }
            let Some(id) = view_data.screens.conversations.selected_id() else {
                view_data.input = InputMode::Nav;
                return;
            };
            view_data.input = InputMode::Nav;
            let action = ActionKind::Reply { body };
            let send_now = !action.requires_confirmation();
            let conversations = &mut view_data.screens.conversations;
            let sent = conversations
                .request_action(id, action)
                .map(drop)
                .and_then(|()| {
                    if !send_now {
                        return Ok(());
                    }
                    conversations
                        .confirm_action(runtime.supplier(), channels.worker.clone())
                        .map(drop)
                });
            report_request(state, view_data, channels, sent);
        }
        _ => {}
    }
}

enum FormStepOutcome {
    Stay,
    Close,
    Output(FormOutput),
    Invalid(String),
    Finished,
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    key: KeyEvent,
) {
    let Some(overlay) = view_data.form.as_mut() else {
        return;
    };
    let outcome = match overlay.phase {
        BookingPhase::Processing { .. } => FormStepOutcome::Stay,
        BookingPhase::Complete { .. } => FormStepOutcome::Finished,
        BookingPhase::Failed(_) => {
            overlay.phase = BookingPhase::Editing;
            FormStepOutcome::Stay
        }
        BookingPhase::Editing => match key.code {
            KeyCode::Esc => {
                if overlay.draft.back() {
                    FormStepOutcome::Stay
                } else {
                    FormStepOutcome::Close
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                overlay.draft.focus_next();
                FormStepOutcome::Stay
            }
            KeyCode::BackTab | KeyCode::Up => {
                overlay.draft.focus_prev();
                FormStepOutcome::Stay
            }
            KeyCode::Backspace => {
                overlay.draft.pop_char();
                FormStepOutcome::Stay
            }
            KeyCode::Char(ch) => {
                overlay.draft.push_char(ch);
                FormStepOutcome::Stay
            }
            KeyCode::Enter => match overlay.draft.advance() {
                Ok(DraftProgress::NextStep(_)) => FormStepOutcome::Stay,
                Ok(DraftProgress::Complete(output)) => FormStepOutcome::Output(output),
                Err(errors) => FormStepOutcome::Invalid(
                    errors
                        .iter()
                        .next()
                        .map(|(_, message)| message.to_owned())
                        .unwrap_or_else(|| "check the highlighted fields".to_owned()),
                ),
            },
            _ => FormStepOutcome::Stay,
        },
    };

    match outcome {
        FormStepOutcome::Stay => {}
        FormStepOutcome::Invalid(message) => {
            emit_status(state, view_data, &channels.internal, message);
        }
        FormStepOutcome::Close => {
            view_data.form = None;
            if matches!(
                state.route,
                Route::Booking(_) | Route::Complaint | Route::CreateMeal
            ) {
                let back = view_data.fallback;
                navigate(state, runtime, view_data, channels, back);
            }
        }
        FormStepOutcome::Finished => {
            view_data.form = None;
            navigate(state, runtime, view_data, channels, Route::FindMeal);
        }
        FormStepOutcome::Output(output) => {
            apply_form_output(state, runtime, view_data, channels, output);
        }
    }
}

fn apply_form_output<R: AppRuntime>(
    state: &mut AppState,
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    output: FormOutput,
) {
    match output {
        FormOutput::AdminLogin(input) => match view_data.admin.login(&input) {
            Ok(()) => {
                view_data.form = None;
                emit_status(state, view_data, &channels.internal, "Welcome back, admin");
                navigate(state, runtime, view_data, channels, Route::AdminDashboard);
            }
            Err(error) => emit_status(state, view_data, &channels.internal, error.to_string()),
        },
        FormOutput::SignIn(input) => {
            let user = view_data.user.login(&input).clone();
            view_data.form = None;
            emit_status(
                state,
                view_data,
                &channels.internal,
                format!("Signed in as {}", user.name),
            );
            navigate(
                state,
                runtime,
                view_data,
                channels,
                Route::after_sign_in(user.role),
            );
        }
        FormOutput::Submit(payload) => submit_form(runtime, view_data, channels, payload),
    }
}

fn submit_form<R: AppRuntime>(
    runtime: &R,
    view_data: &mut ViewData,
    channels: &Channels,
    payload: FormPayload,
) {
    view_data.next_submit_id = view_data.next_submit_id.saturating_add(1).max(1);
    let request_id = view_data.next_submit_id;
    if let Some(overlay) = view_data.form.as_mut() {
        overlay.phase = BookingPhase::Processing { request_id };
    }
    debug!(form = payload.kind().label(), request_id, "form submitted");
    spawn_submit(
        runtime.supplier(),
        payload,
        request_id,
        channels.worker.clone(),
    );
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = Route::TABS
        .iter()
        .position(|tab| *tab == state.active_tab().unwrap_or(view_data.tab_anchor))
        .unwrap_or(0);
    let tabs = Tabs::new(Route::TABS.iter().map(|tab| tab.title()).collect::<Vec<_>>())
        .block(Block::default().title(APP_TITLE).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    render_body(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(kind) = list_kind(state.route)
        && let Some(prompt) = view_data.screens.get(kind).pending_prompt()
    {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(format!("{prompt}\n\ny confirm | n cancel"))
            .block(Block::default().title("confirm").borders(Borders::ALL));
        frame.render_widget(modal, area);
    }

    if let Some(overlay) = &view_data.form {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(render_form_text(overlay))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(overlay.draft.kind().label())
                    .borders(Borders::ALL),
            );
        frame.render_widget(form, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_body(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let screens = &view_data.screens;
    match state.route {
        Route::FindMeal => render_list(frame, area, state.route, &screens.meals),
        Route::AdminUsers => render_list(frame, area, state.route, &screens.users),
        Route::AdminSessions => render_list(frame, area, state.route, &screens.sessions),
        Route::AdminReports => render_list(frame, area, state.route, &screens.reports),
        Route::Messages => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            render_list(frame, columns[0], state.route, &screens.conversations);
            let thread = Paragraph::new(render_thread_text(view_data))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("conversation").borders(Borders::ALL));
            frame.render_widget(thread, columns[1]);
        }
        Route::CookDashboard => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(1)])
                .split(area);
            let block = Block::default()
                .title("cook dashboard")
                .borders(Borders::ALL);
            let summary = Paragraph::new(render_cook_dashboard_text(view_data)).block(block);
            frame.render_widget(summary, rows[0]);
            render_list(frame, rows[1], state.route, &screens.bookings);
        }
        Route::AdminDashboard => {
            let block = Block::default()
                .title("admin dashboard")
                .borders(Borders::ALL);
            let body = Paragraph::new(render_admin_dashboard_text(view_data)).block(block);
            frame.render_widget(body, area);
        }
        route => {
            let body = Paragraph::new(render_page_text(route, view_data))
                .wrap(Wrap { trim: false })
                .block(Block::default().title(route.title()).borders(Borders::ALL));
            frame.render_widget(body, area);
        }
    }
}

fn render_list<T: TableRows>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    route: Route,
    controller: &ViewController<T>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(list_title(route, controller));
    if let Some(text) = list_placeholder(controller) {
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let header = Row::new(T::HEADERS.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let selected = controller.selected_id();
    let rows = controller.view().into_iter().map(|item| {
        let style = if Some(item.id()) == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(item.cells()).style(style)
    });
    let widths = vec![Constraint::Min(6); T::HEADERS.len().max(1)];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn list_title<T: ListItem>(route: Route, controller: &ViewController<T>) -> String {
    let mut title = route.title().to_owned();
    let summary = ListScreen::filter_summary(controller);
    if !summary.is_empty() {
        title.push_str(" | ");
        title.push_str(&summary);
    }
    if controller.is_loading() {
        title.push_str(" | loading");
    }
    if controller.running_action().is_some() {
        title.push_str(" | working");
    }
    title
}

/// Text shown instead of the table while loading, after a failure, or when
/// the filtered view is empty.
fn list_placeholder<T: ListItem>(controller: &ViewController<T>) -> Option<String> {
    let noun = T::COLLECTION.as_str();
    match controller.load_state() {
        LoadState::Failed(message) => Some(format!("{message}\npress r to retry")),
        LoadState::Idle | LoadState::Loading { .. } if controller.source().is_empty() => {
            Some(format!("Loading {noun}..."))
        }
        _ if controller.view().is_empty() => Some(format!("No {noun} found")),
        _ => None,
    }
}

fn render_thread_text(view_data: &ViewData) -> String {
    let Some(conversation) = view_data.screens.conversations.selected() else {
        return "Select a conversation".to_owned();
    };
    let mut lines = conversation
        .messages
        .iter()
        .map(|message| format!("{} ({}): {}", message.sender, message.time, message.body))
        .collect::<Vec<_>>();
    lines.push(String::new());
    match &view_data.input {
        InputMode::Reply(buffer) => lines.push(format!("> {buffer}_")),
        _ => lines.push("enter to reply".to_owned()),
    }
    lines.join("\n")
}

fn render_cook_dashboard_text(view_data: &ViewData) -> String {
    let Some(user) = view_data.user.user() else {
        return "Sign in as a cook to see your dashboard".to_owned();
    };
    let stats = cook_stats(
        &user.name,
        view_data.screens.meals.source(),
        view_data.screens.bookings.source(),
        view_data.today,
    );
    let rating = stats
        .average_rating
        .map_or_else(|| "-".to_owned(), |rating| format!("{rating:.1}"));
    format!(
        "Welcome back, {}\nEarnings: {} | Meals shared: {} | Rating: {rating} | Upcoming bookings: {}\nn create a meal",
        user.name,
        format_pesewas(stats.total_earnings_pesewas),
        stats.meals_shared,
        stats.upcoming_bookings,
    )
}

fn render_admin_dashboard_text(view_data: &ViewData) -> String {
    let screens = &view_data.screens;
    let loading = [
        CollectionKind::Users,
        CollectionKind::Sessions,
        CollectionKind::Meals,
    ]
    .into_iter()
    .any(|kind| {
        let load = screens.get(kind).load_state();
        matches!(load, LoadState::Idle | LoadState::Loading { .. })
    });
    let stats = admin_stats(
        screens.users.source(),
        screens.sessions.source(),
        screens.meals.source(),
    );
    let counts = |pairs: Vec<(&'static str, usize)>| {
        pairs
            .into_iter()
            .map(|(label, count)| format!("{label} {count}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    let mut lines = Vec::new();
    if loading {
        lines.push("Loading dashboard...".to_owned());
    }
    lines.push(format!(
        "Total users: {} ({} active)",
        stats.total_users, stats.active_users
    ));
    lines.push(format!("Meal sessions: {}", stats.total_sessions));
    lines.push(format!(
        "Total revenue: {} ({})",
        format_pesewas(stats.total_revenue_pesewas),
        format_compact_pesewas(stats.total_revenue_pesewas)
    ));
    lines.push(String::new());
    lines.push(format!(
        "Users: {}",
        counts(
            screens
                .users
                .category_counts()
                .into_iter()
                .map(|(status, count)| (status.as_str(), count))
                .collect()
        )
    ));
    lines.push(format!(
        "Sessions: {}",
        counts(
            screens
                .sessions
                .category_counts()
                .into_iter()
                .map(|(status, count)| (status.as_str(), count))
                .collect()
        )
    ));
    lines.push(format!(
        "Reports: {}",
        counts(
            screens
                .reports
                .category_counts()
                .into_iter()
                .map(|(status, count)| (status.as_str(), count))
                .collect()
        )
    ));
    lines.join("\n")
}

fn render_page_text(route: Route, view_data: &ViewData) -> String {
    match route {
        Route::MealDetails(id) | Route::Booking(id) => {
            let meals = view_data.screens.meals.source();
            match meals.iter().find(|meal| meal.id == id) {
                Some(meal) => render_meal_details_text(meal),
                None => format!("Meal {id} is not loaded. Press r to refresh."),
            }
        }
        Route::SignIn => "Sign in to continue. Press L to sign in or tab to move on.".to_owned(),
        Route::AdminLogin => {
            "Admin access required. Press L to log in or tab to move on.".to_owned()
        }
        Route::Profile => match view_data.user.user() {
            Some(user) => format!(
                "{}\n{}\nRole: {}\n\nL sign out",
                user.name,
                user.email,
                user.role.as_str()
            ),
            None => "Not signed in".to_owned(),
        },
        Route::Home => "Welcome to MealJoin. Share home-cooked meals with neighbours.\n\n\
tab browse meals | L sign in | c report a problem"
            .to_owned(),
        other => format!("{}\n\ntab to browse", other.title()),
    }
}

fn render_meal_details_text(meal: &Meal) -> String {
    format!(
        "{}\nHosted by {} | {}\n\n{}\n\nPrice: {} per guest\nTime: {} | Location: {}\nRating: {:.1} ({} reviews) | {} spots left\n\nb book | c report a problem | esc back",
        meal.title,
        meal.host_name,
        meal.category.label(),
        meal.description,
        format_pesewas(meal.price_pesewas),
        format_clock_time(meal.time),
        meal.location,
        meal.rating,
        meal.reviews,
        meal.spots_left,
    )
}

fn render_form_text(overlay: &FormOverlay) -> String {
    let draft = &overlay.draft;
    match &overlay.phase {
        BookingPhase::Processing { .. } => {
            return if draft.kind() == FormKind::Booking {
                "Processing payment...".to_owned()
            } else {
                "Submitting...".to_owned()
            };
        }
        BookingPhase::Complete {
            reference,
            total_pesewas,
        } => {
            return format!(
                "Booking confirmed!\n\nReference: {reference}\nTotal paid: {}\n\npress any key to continue",
                format_pesewas(*total_pesewas)
            );
        }
        BookingPhase::Failed(message) => {
            return format!("Payment failed: {message}\n\npress any key to edit the booking");
        }
        BookingPhase::Editing => {}
    }

    let step = draft.step();
    let mut lines = vec![format!(
        "Step {}/{}: {}",
        draft.step_index() + 1,
        draft.step_count(),
        step.title
    )];
    if let Some(meal) = draft.meal() {
        let guests = draft.value("guests").trim().parse::<u32>().unwrap_or(0);
        lines.push(format!(
            "{} | {} per guest | total with 10% service fee: {}",
            meal.title,
            format_pesewas(meal.price_pesewas),
            format_pesewas(booking_total(meal.price_pesewas, guests))
        ));
    }
    lines.push(String::new());
    for (index, field) in step.fields.iter().enumerate() {
        let marker = if index == draft.focus_index() {
            ">"
        } else {
            " "
        };
        let raw = draft.value(field.key);
        let value = if field.secret {
            "*".repeat(raw.chars().count())
        } else {
            raw.to_owned()
        };
        let mut line = format!("{marker} {}: {value}", field.label);
        if value.is_empty() && !field.hint.is_empty() {
            line.push_str(&format!("  ({})", field.hint));
        }
        if let Some(error) = draft.errors().get(field.key) {
            line.push_str(&format!("  ! {error}"));
        }
        lines.push(line);
    }
    lines.push(String::new());
    let enter = if draft.is_last_step() {
        "submit"
    } else {
        "next"
    };
    let esc = if draft.step_index() > 0 {
        "back"
    } else {
        "cancel"
    };
    lines.push(format!("enter {enter} | tab/shift+tab field | esc {esc}"));
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let hints = match (&view_data.input, &view_data.form) {
        (_, Some(_)) => "type to edit | enter next | esc back",
        (InputMode::Search, None) => "type to search | enter keep | esc clear",
        (InputMode::Reply(_), None) => "type a message | enter send | esc cancel",
        (InputMode::Nav, None) => screen_hints(state.route),
    };
    match &state.status_line {
        Some(status) => format!("{} | {status} | {hints}", state.route.title()),
        None => format!("{} | {hints}", state.route.title()),
    }
}

fn screen_hints(route: Route) -> &'static str {
    match route {
        Route::FindMeal => "/ search | f category | s/S sort | enter details | b book | tab | ?",
        Route::Messages => "/ search | up/down select | enter reply | r refresh | tab | ?",
        Route::CookDashboard => "n new meal | f status | s/S sort | r refresh | tab | ?",
        Route::AdminUsers => "x suspend/activate | / search | f status | s/S sort | tab | ?",
        Route::AdminSessions => "d delete | D deactivate | / search | f status | tab | ?",
        Route::AdminReports => "v resolve | / search | f status | s/S sort | tab | ?",
        _ => "tab screens | L login | c complaint | ? help | ctrl+q quit",
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | tab/shift+tab screens | L sign in/out | c complaint | p profile | ? help\n\
lists: / search | f category | s sort key | S sort direction | up/down select | r refresh\n\
find meal: enter details | b book\n\
messages: enter reply (enter send, esc cancel)\n\
cook dashboard: n create meal\n\
admin users: x suspend/activate | sessions: d delete, D deactivate | reports: v resolve\n\
confirm: y confirm | n/esc cancel\n\
forms: tab/shift+tab field | enter next/submit | esc back/cancel"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, Channels, FormOverlay, InputMode, ViewData, handle_key_event,
        handle_worker_event, list_placeholder, render_admin_dashboard_text, render_form_text,
        status_text,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use mealjoin_app::{
        ActionKind, AppState, Booking, BookingId, BookingPhase, BookingStatus, CollectionSnapshot,
        DataSupplier, FormDraft, FormKind, LoadState, MutationOutcome, Record, RecordId, Role,
        Route, SignInInput, User, UserStatus, ViewController, WorkerEvent,
    };
    use mealjoin_testkit::{MealFaker, ScriptedSupplier, fixture_today};
    use std::sync::Arc;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;
    use time::Date;

    struct TestRuntime {
        supplier: Arc<ScriptedSupplier>,
    }

    impl AppRuntime for TestRuntime {
        fn supplier(&self) -> Arc<dyn DataSupplier> {
            self.supplier.clone()
        }

        fn today(&self) -> Date {
            fixture_today()
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        view_data: ViewData,
        channels: Channels,
        worker_rx: Receiver<WorkerEvent>,
    }

    impl Harness {
        fn new(supplier: ScriptedSupplier) -> Self {
            let (internal, _internal_rx) = mpsc::channel();
            let (worker, worker_rx) = mpsc::channel();
            Self {
                state: AppState::default(),
                runtime: TestRuntime {
                    supplier: Arc::new(supplier),
                },
                view_data: ViewData::new(fixture_today(), Duration::from_secs(60)),
                channels: Channels { internal, worker },
                worker_rx,
            }
        }

        fn press(&mut self, code: KeyCode) -> bool {
            self.press_with(code, KeyModifiers::NONE)
        }

        fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            handle_key_event(
                &mut self.state,
                &self.runtime,
                &mut self.view_data,
                &self.channels,
                KeyEvent::new(code, modifiers),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn clear_field(&mut self) {
            for _ in 0..32 {
                self.press(KeyCode::Backspace);
            }
        }

        /// Waits for `count` worker results and applies them in arrival order.
        fn drain(&mut self, count: usize) {
            for _ in 0..count {
                let event = self
                    .worker_rx
                    .recv_timeout(Duration::from_secs(5))
                    .expect("worker event");
                handle_worker_event(
                    &mut self.state,
                    &self.runtime,
                    &mut self.view_data,
                    &self.channels,
                    event,
                );
            }
        }

        fn sign_in_admin(&mut self) {
            self.view_data
                .admin
                .login(&mealjoin_app::LoginInput {
                    email: mealjoin_app::ADMIN_EMAIL.to_owned(),
                    password: mealjoin_app::ADMIN_PASSWORD.to_owned(),
                })
                .expect("admin credentials");
        }

        fn goto(&mut self, route: Route) {
            super::navigate(
                &mut self.state,
                &self.runtime,
                &mut self.view_data,
                &self.channels,
                route,
            );
        }
    }

    fn demo_users() -> Vec<User> {
        let mut users = MealFaker::new(9).users(3);
        for (index, user) in users.iter_mut().enumerate() {
            user.name = format!("User {}", index + 1);
            user.status = UserStatus::Active;
        }
        users
    }

    #[test]
    fn guest_tabbing_to_messages_is_sent_to_sign_in() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        harness.goto(Route::FindMeal);
        harness.drain(1);

        harness.press(KeyCode::Tab);
        assert_eq!(harness.state.route, Route::SignIn);
        let form = harness.view_data.form.as_ref().expect("sign-in form");
        assert_eq!(form.draft.kind(), FormKind::SignIn);

        harness.press(KeyCode::Esc);
        assert!(harness.view_data.form.is_none());
        assert_eq!(harness.state.route, Route::SignIn);

        // Rotation continues from the blocked tab, not from the start.
        harness.press(KeyCode::Tab);
        assert_eq!(harness.state.route, Route::SignIn);
        assert_eq!(harness.view_data.tab_anchor, Route::CookDashboard);
    }

    #[test]
    fn loaded_screens_refetch_only_on_refresh_key() {
        let meals = MealFaker::new(3).meals(4);
        let mut harness =
            Harness::new(ScriptedSupplier::new().with_snapshot(CollectionSnapshot::Meals(meals)));
        harness.goto(Route::FindMeal);
        harness.drain(1);
        assert_eq!(harness.runtime.supplier.fetch_count(), 1);

        harness.goto(Route::Home);
        harness.goto(Route::FindMeal);
        assert_eq!(harness.runtime.supplier.fetch_count(), 1);

        harness.press(KeyCode::Char('r'));
        harness.drain(1);
        assert_eq!(harness.runtime.supplier.fetch_count(), 2);
    }

    #[test]
    fn cook_sign_in_lands_on_cook_dashboard() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        harness.goto(Route::SignIn);
        harness.type_text("kevin@example.com");
        harness.press(KeyCode::Tab);
        harness.type_text("secret1");
        harness.press(KeyCode::Tab);
        harness.clear_field();
        harness.type_text("cook");
        harness.press(KeyCode::Enter);

        assert!(harness.view_data.form.is_none());
        assert_eq!(harness.state.route, Route::CookDashboard);
        let user = harness.view_data.user.user().expect("signed in");
        assert_eq!(user.name, "Kevin Asante");
        assert_eq!(user.role, Role::Cook);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("Signed in as Kevin Asante")
        );
        harness.drain(2);
    }

    #[test]
    fn short_password_keeps_sign_in_form_open() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        harness.goto(Route::SignIn);
        harness.type_text("ama@example.com");
        harness.press(KeyCode::Tab);
        harness.type_text("abc");
        harness.press(KeyCode::Enter);

        let form = harness.view_data.form.as_ref().expect("form stays open");
        assert_eq!(
            form.draft.errors().get("password"),
            Some("Password must be at least 6 characters")
        );
        assert!(!harness.view_data.user.is_authenticated());
    }

    #[test]
    fn wrong_admin_password_reports_invalid_credentials() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        harness.goto(Route::AdminUsers);
        assert_eq!(harness.state.route, Route::AdminLogin);

        harness.type_text("admin@mealjoin.com");
        harness.press(KeyCode::Tab);
        harness.type_text("wrong-password");
        harness.press(KeyCode::Enter);

        assert!(harness.view_data.form.is_some());
        assert!(!harness.view_data.admin.is_authenticated());
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("Invalid email or password")
        );
    }

    #[test]
    fn cancelled_suspend_leaves_user_untouched() {
        let users = demo_users();
        let supplier =
            ScriptedSupplier::new().with_snapshot(CollectionSnapshot::Users(users.clone()));
        let mut harness = Harness::new(supplier);
        harness.sign_in_admin();
        harness.goto(Route::AdminUsers);
        harness.drain(1);
        assert_eq!(harness.view_data.screens.users.source(), users.as_slice());

        harness.press(KeyCode::Char('x'));
        assert_eq!(
            harness.view_data.screens.users.pending_prompt().as_deref(),
            Some("Suspend \"User 1\"?")
        );
        harness.press(KeyCode::Char('n'));
        assert!(harness.view_data.screens.users.pending_action().is_none());
        assert!(harness.runtime.supplier.mutation_log().is_empty());
        assert_eq!(harness.view_data.screens.users.source(), users.as_slice());
    }

    #[test]
    fn confirmed_suspend_updates_row_and_status_line() {
        let users = demo_users();
        let mut suspended = users[1].clone();
        suspended.status = UserStatus::Suspended;
        let supplier = ScriptedSupplier::new()
            .with_snapshot(CollectionSnapshot::Users(users.clone()))
            .with_mutation(Ok(MutationOutcome::Updated(Record::User(suspended))));
        let mut harness = Harness::new(supplier);
        harness.sign_in_admin();
        harness.goto(Route::AdminUsers);
        harness.drain(1);

        harness.press(KeyCode::Down);
        harness.press(KeyCode::Char('x'));
        harness.press(KeyCode::Char('y'));
        harness.drain(1);

        let row = harness
            .view_data
            .screens
            .users
            .source()
            .iter()
            .find(|user| user.id == users[1].id)
            .expect("row");
        assert_eq!(row.status, UserStatus::Suspended);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("User suspended successfully")
        );
        assert_eq!(
            harness.runtime.supplier.mutation_log(),
            vec![(RecordId::from(users[1].id), ActionKind::Suspend)]
        );
    }

    #[test]
    fn reply_is_sent_without_a_prompt() {
        let mut conversation = MealFaker::new(6).conversation();
        conversation.unread = true;
        let mut replied = conversation.clone();
        replied.last_message = "On my way".to_owned();
        let conversations = vec![conversation.clone()];
        let supplier = ScriptedSupplier::new()
            .with_snapshot(CollectionSnapshot::Conversations(conversations))
            .with_mutation(Ok(MutationOutcome::Updated(Record::Conversation(replied))));
        let mut harness = Harness::new(supplier);
        harness.view_data.user.login(&SignInInput {
            email: "ama@example.com".to_owned(),
            password: "secret123".to_owned(),
            role: Role::Diner,
        });
        harness.goto(Route::Messages);
        harness.drain(1);

        harness.press(KeyCode::Enter);
        assert!(matches!(harness.view_data.input, InputMode::Reply(_)));
        harness.type_text("On my way");
        harness.press(KeyCode::Enter);
        assert!(
            harness
                .view_data
                .screens
                .conversations
                .pending_action()
                .is_none()
        );
        harness.drain(1);

        assert_eq!(
            harness.runtime.supplier.mutation_log(),
            vec![(
                RecordId::from(conversation.id),
                ActionKind::Reply {
                    body: "On my way".to_owned()
                }
            )]
        );
        assert_eq!(harness.state.status_line.as_deref(), Some("Message sent"));
        let row = &harness.view_data.screens.conversations.source()[0];
        assert_eq!(row.last_message, "On my way");
    }

    #[test]
    fn search_edits_filter_live_and_escape_clears() {
        let mut faker = MealFaker::new(4);
        let mut meals = faker.meals(4);
        meals[2].title = "Zobo Tasting Evening".to_owned();
        let mut harness =
            Harness::new(ScriptedSupplier::new().with_snapshot(CollectionSnapshot::Meals(meals)));
        harness.goto(Route::FindMeal);
        harness.drain(1);

        harness.press(KeyCode::Char('/'));
        assert_eq!(harness.view_data.input, InputMode::Search);
        harness.type_text("ZOBO");
        assert_eq!(harness.view_data.screens.meals.view().len(), 1);
        assert!(status_text(&harness.state, &harness.view_data).contains("esc clear"));

        harness.press(KeyCode::Esc);
        assert_eq!(harness.view_data.input, InputMode::Nav);
        assert_eq!(harness.view_data.screens.meals.view().len(), 4);
    }

    #[test]
    fn placeholders_cover_loading_error_and_empty_states() {
        let mut users = ViewController::<User>::new();
        users.begin_refresh();
        assert_eq!(
            list_placeholder(&users).as_deref(),
            Some("Loading users...")
        );

        let mut failed = ViewController::<User>::new();
        let ticket = failed.begin_refresh();
        failed.finish_refresh(ticket.request_id, Err("failed to load users".to_owned()));
        assert_eq!(
            list_placeholder(&failed).as_deref(),
            Some("failed to load users\npress r to retry")
        );

        let empty = ViewController::<User>::with_source(Vec::new());
        assert_eq!(list_placeholder(&empty).as_deref(), Some("No users found"));

        let mut filtered = ViewController::with_source(demo_users());
        filtered.set_search_term("nobody matches this");
        assert_eq!(
            list_placeholder(&filtered).as_deref(),
            Some("No users found")
        );
    }

    #[test]
    fn fetch_failure_is_shown_on_the_status_line() {
        let mut harness =
            Harness::new(ScriptedSupplier::new().failing_fetches("failed to load meals"));
        harness.goto(Route::FindMeal);
        harness.drain(1);
        assert_eq!(
            harness.view_data.screens.meals.load_state(),
            &LoadState::Failed("failed to load meals".to_owned())
        );
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("failed to load meals -- press r to retry")
        );
    }

    #[test]
    fn booking_runs_through_processing_to_a_reference() {
        let mut meal = MealFaker::new(2).meal();
        meal.spots_left = 4;
        meal.price_pesewas = 7_000;
        let confirmed = Booking {
            id: BookingId::new(10),
            meal_id: Some(meal.id),
            guest_name: "Ama Serwaa".to_owned(),
            meal_title: meal.title.clone(),
            date: fixture_today(),
            time: meal.time,
            guests: 2,
            amount_pesewas: 15_400,
            status: BookingStatus::Confirmed,
            reference: "MJ-123456".to_owned(),
        };
        let supplier = ScriptedSupplier::new()
            .with_snapshot(CollectionSnapshot::Meals(vec![meal.clone()]))
            .with_submission(Ok(Record::Booking(confirmed)));
        let mut harness = Harness::new(supplier);
        harness.goto(Route::FindMeal);
        harness.drain(1);

        harness.press(KeyCode::Char('b'));
        assert_eq!(harness.state.route, Route::Booking(meal.id));
        harness.clear_field();
        harness.type_text("2");
        for value in ["Ama", "Serwaa", "ama@example.com", "0201234567"] {
            harness.press(KeyCode::Tab);
            harness.type_text(value);
        }
        harness.press(KeyCode::Enter);
        let overlay = harness.view_data.form.as_ref().expect("booking form");
        assert_eq!(overlay.draft.step_index(), 1);

        harness.type_text("4111111111111111");
        harness.press(KeyCode::Tab);
        harness.type_text("12/29");
        harness.press(KeyCode::Tab);
        harness.type_text("123");
        harness.press(KeyCode::Tab);
        harness.type_text("Ama Serwaa");
        harness.press(KeyCode::Enter);
        let overlay = harness.view_data.form.as_ref().expect("processing form");
        assert!(matches!(overlay.phase, BookingPhase::Processing { .. }));

        harness.drain(1);
        let overlay = harness.view_data.form.as_ref().expect("booking form");
        assert_eq!(
            overlay.phase,
            BookingPhase::Complete {
                reference: "MJ-123456".to_owned(),
                total_pesewas: 15_400,
            }
        );
        assert!(render_form_text(overlay).contains("MJ-123456"));
        let submitted = harness.runtime.supplier.submission_log();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].kind(), FormKind::Booking);

        // Meals and bookings refresh after the payment goes through.
        harness.drain(2);
        harness.press(KeyCode::Enter);
        assert!(harness.view_data.form.is_none());
        assert_eq!(harness.state.route, Route::FindMeal);
    }

    #[test]
    fn stale_submission_result_is_ignored() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        harness.view_data.form = Some(FormOverlay {
            draft: FormDraft::complaint(),
            phase: BookingPhase::Processing { request_id: 7 },
        });
        handle_worker_event(
            &mut harness.state,
            &harness.runtime,
            &mut harness.view_data,
            &harness.channels,
            WorkerEvent::Submitted {
                form: FormKind::Complaint,
                request_id: 3,
                result: Err("late".to_owned()),
            },
        );
        let overlay = harness.view_data.form.as_ref().expect("form stays open");
        assert_eq!(overlay.phase, BookingPhase::Processing { request_id: 7 });
        assert_eq!(harness.state.status_line, None);
    }

    #[test]
    fn admin_dashboard_summarizes_loaded_collections() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        let mut users = demo_users();
        users[0].status = UserStatus::Suspended;
        harness.view_data.screens.users = ViewController::with_source(users);
        harness.view_data.screens.sessions = ViewController::with_source(Vec::new());
        harness.view_data.screens.meals = ViewController::with_source(Vec::new());
        let text = render_admin_dashboard_text(&harness.view_data);
        assert!(text.contains("Total users: 3 (2 active)"));
        assert!(text.contains("Users: active 2 | suspended 1"));
        assert!(!text.contains("Loading"));
    }

    #[test]
    fn ctrl_q_quits() {
        let mut harness = Harness::new(ScriptedSupplier::new());
        assert!(harness.press_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!harness.press(KeyCode::Char('?')));
        assert!(harness.view_data.help_visible);
    }
}
