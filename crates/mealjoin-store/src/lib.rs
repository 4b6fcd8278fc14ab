// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! In-memory marketplace store. Every call sleeps for the configured latency
//! before touching data, and the sleep observes the caller's cancel token.

mod fixtures;

pub use fixtures::{Collections, DEMO_COOK};

use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow, bail};
use mealjoin_app::validation::format_clock_time;
use mealjoin_app::{
    ActionKind, Booking, BookingId, BookingRequest, BookingStatus, CancelToken, CollectionKind,
    CollectionSnapshot, ComplaintInput, DataSupplier, FormPayload, Meal, MealId, Message,
    MessageId, MutationOutcome, NewMeal, Record, RecordId, Report, ReportId, ReportStatus,
    SessionStatus, UserStatus, booking_reference,
};
use time::OffsetDateTime;
use tracing::{debug, info};

pub const APP_NAME: &str = "mealjoin";

const SLEEP_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub latency: Duration,
    pub payment_delay: Duration,
    pub fail_fetches: bool,
    pub fail_mutations: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(1),
            payment_delay: Duration::from_secs(3),
            fail_fetches: false,
            fail_mutations: false,
        }
    }
}

impl StoreOptions {
    /// No delays, no injected failures.
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            payment_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct MockStore {
    data: Mutex<Collections>,
    options: StoreOptions,
}

impl MockStore {
    pub fn demo(options: StoreOptions) -> Self {
        Self::with_collections(Collections::demo(), options)
    }

    pub fn with_collections(collections: Collections, options: StoreOptions) -> Self {
        Self {
            data: Mutex::new(collections),
            options,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Copy of the current data, for assertions and one-shot listings.
    pub fn snapshot(&self) -> Result<Collections> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        self.data.lock().map_err(|_| anyhow!("store lock poisoned"))
    }

    fn pause(&self, duration: Duration, cancel: &CancelToken) -> Result<()> {
        let deadline = Instant::now() + duration;
        loop {
            if cancel.is_cancelled() {
                bail!("request cancelled");
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            thread::sleep(SLEEP_SLICE.min(remaining));
        }
    }

    fn apply(&self, target: RecordId, action: &ActionKind) -> Result<MutationOutcome> {
        let mut data = self.lock()?;
        match (target, action) {
            (RecordId::User(id), ActionKind::Suspend | ActionKind::Activate) => {
                let status = if matches!(action, ActionKind::Suspend) {
                    UserStatus::Suspended
                } else {
                    UserStatus::Active
                };
                let user = data
                    .users
                    .iter_mut()
                    .find(|user| user.id == id)
                    .ok_or_else(|| missing(target))?;
                user.status = status;
                Ok(MutationOutcome::Updated(Record::User(user.clone())))
            }
            (RecordId::Session(id), ActionKind::Delete) => {
                let before = data.sessions.len();
                data.sessions.retain(|session| session.id != id);
                if data.sessions.len() == before {
                    return Err(missing(target));
                }
                Ok(MutationOutcome::Removed(target))
            }
            (RecordId::Session(id), ActionKind::Deactivate) => {
                let session = data
                    .sessions
                    .iter_mut()
                    .find(|session| session.id == id)
                    .ok_or_else(|| missing(target))?;
                session.status = SessionStatus::Cancelled;
                Ok(MutationOutcome::Updated(Record::Session(session.clone())))
            }
            (RecordId::Report(id), ActionKind::Resolve) => {
                let report = data
                    .reports
                    .iter_mut()
                    .find(|report| report.id == id)
                    .ok_or_else(|| missing(target))?;
                report.status = ReportStatus::Resolved;
                Ok(MutationOutcome::Updated(Record::Report(report.clone())))
            }
            (RecordId::Conversation(id), ActionKind::Reply { body }) => {
                let body = body.trim();
                if body.is_empty() {
                    bail!("message is empty -- type something before sending");
                }
                let conversation = data
                    .conversations
                    .iter_mut()
                    .find(|conversation| conversation.id == id)
                    .ok_or_else(|| missing(target))?;
                let next_id = conversation
                    .messages
                    .iter()
                    .map(|message| message.id.get())
                    .max()
                    .unwrap_or(0)
                    + 1;
                conversation.messages.push(Message {
                    id: MessageId::new(next_id),
                    sender: "You".to_owned(),
                    body: body.to_owned(),
                    time: format_clock_time(now().time()),
                    is_own: true,
                });
                conversation.last_message = body.to_owned();
                conversation.time = "Just now".to_owned();
                conversation.unread = false;
                let updated = Record::Conversation(conversation.clone());
                Ok(MutationOutcome::Updated(updated))
            }
            _ => bail!(
                "cannot {} a {} -- pick a different action",
                action.label(),
                target.kind().noun()
            ),
        }
    }

    fn book(&self, request: &BookingRequest) -> Result<Record> {
        let mut data = self.lock()?;
        let meal = data
            .meals
            .iter_mut()
            .find(|meal| meal.id == request.meal_id)
            .ok_or_else(|| missing(RecordId::Meal(request.meal_id)))?;
        if request.guests > meal.spots_left {
            bail!(
                "only {} spots left for {} -- lower the guest count",
                meal.spots_left,
                meal.title
            );
        }
        meal.spots_left -= request.guests;
        let time = meal.time;
        let stamp = now();
        let id = next_id(data.bookings.iter().map(|booking| booking.id.get()));
        let booking = Booking {
            id: BookingId::new(id),
            meal_id: Some(request.meal_id),
            guest_name: request.guest_name.clone(),
            meal_title: request.meal_title.clone(),
            date: stamp.date(),
            time,
            guests: request.guests,
            amount_pesewas: request.total_pesewas,
            status: BookingStatus::Confirmed,
            reference: booking_reference(stamp.unix_timestamp_nanos() / 1_000_000),
        };
        data.bookings.push(booking.clone());
        Ok(Record::Booking(booking))
    }

    fn create_meal(&self, new_meal: &NewMeal) -> Result<Record> {
        let mut data = self.lock()?;
        let meal = Meal {
            id: MealId::new(next_id(data.meals.iter().map(|meal| meal.id.get()))),
            host_name: new_meal.host_name.clone(),
            title: new_meal.basics.title.clone(),
            description: new_meal.basics.description.clone(),
            category: new_meal.basics.category,
            price_pesewas: new_meal.logistics.price_pesewas,
            location: new_meal.logistics.location.clone(),
            time: new_meal.logistics.time,
            rating: 0.0,
            reviews: 0,
            spots_left: new_meal.logistics.max_guests,
        };
        data.meals.push(meal.clone());
        Ok(Record::Meal(meal))
    }

    fn file_complaint(&self, complaint: &ComplaintInput) -> Result<Record> {
        let mut data = self.lock()?;
        let reported_user = if complaint.host_name.trim().is_empty() {
            "Unknown host".to_owned()
        } else {
            complaint.host_name.trim().to_owned()
        };
        let report = Report {
            id: ReportId::new(next_id(data.reports.iter().map(|report| report.id.get()))),
            reporter_name: complaint.name.clone(),
            reported_user,
            reported_event: None,
            reason: complaint.complaint_type.label().to_owned(),
            description: format!(
                "{}: {}",
                complaint.subject.trim(),
                complaint.description.trim()
            ),
            date_reported: complaint.incident_date.unwrap_or_else(|| now().date()),
            status: ReportStatus::Pending,
        };
        data.reports.push(report.clone());
        Ok(Record::Report(report))
    }
}

impl DataSupplier for MockStore {
    fn fetch_collection(
        &self,
        kind: CollectionKind,
        cancel: &CancelToken,
    ) -> Result<CollectionSnapshot> {
        self.pause(self.options.latency, cancel)?;
        if self.options.fail_fetches {
            bail!("failed to load {}", kind.as_str());
        }
        let data = self.lock()?;
        let snapshot = match kind {
            CollectionKind::Meals => CollectionSnapshot::Meals(data.meals.clone()),
            CollectionKind::Users => CollectionSnapshot::Users(data.users.clone()),
            CollectionKind::Sessions => CollectionSnapshot::Sessions(data.sessions.clone()),
            CollectionKind::Reports => CollectionSnapshot::Reports(data.reports.clone()),
            CollectionKind::Conversations => {
                CollectionSnapshot::Conversations(data.conversations.clone())
            }
            CollectionKind::Bookings => CollectionSnapshot::Bookings(data.bookings.clone()),
        };
        debug!(
            kind = kind.as_str(),
            rows = snapshot.len(),
            "collection fetched"
        );
        Ok(snapshot)
    }

    fn mutate(
        &self,
        target: RecordId,
        action: &ActionKind,
        cancel: &CancelToken,
    ) -> Result<MutationOutcome> {
        self.pause(self.options.latency, cancel)?;
        if self.options.fail_mutations {
            bail!(
                "could not {} {} {}",
                action.label(),
                target.kind().noun(),
                target.raw()
            );
        }
        let outcome = self.apply(target, action)?;
        info!(
            kind = target.kind().as_str(),
            id = target.raw(),
            action = action.label(),
            "record mutated"
        );
        Ok(outcome)
    }

    fn submit(&self, payload: &FormPayload, cancel: &CancelToken) -> Result<Record> {
        payload.validate()?;
        let delay = match payload {
            FormPayload::Booking(_) => self.options.payment_delay,
            FormPayload::CreateMeal(_) | FormPayload::Complaint(_) => self.options.latency,
        };
        self.pause(delay, cancel)?;
        if self.options.fail_mutations {
            bail!(
                "{} could not be submitted -- try again",
                payload.kind().label()
            );
        }
        let record = match payload {
            FormPayload::Booking(request) => self.book(request)?,
            FormPayload::CreateMeal(new_meal) => self.create_meal(new_meal)?,
            FormPayload::Complaint(complaint) => self.file_complaint(complaint)?,
        };
        info!(
            form = payload.kind().label(),
            id = record.id().raw(),
            "form submitted"
        );
        Ok(record)
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().unwrap_or(0) + 1
}

fn missing(target: RecordId) -> anyhow::Error {
    anyhow!(
        "{} {} no longer exists -- refresh and try again",
        target.kind().noun(),
        target.raw()
    )
}

