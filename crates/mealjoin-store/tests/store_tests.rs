// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use mealjoin_app::{
    ActionKind, BookingRequest, BookingStatus, CancelToken, CollectionKind, CollectionSnapshot,
    ComplaintInput, ComplaintType, ConversationId, DataSupplier, FormPayload, MealBasics,
    MealCategory, MealGuidelines, MealId, MealIngredients, MealLogistics, MealPhotos,
    MutationOutcome, NewMeal, Record, RecordId, ReportId, ReportStatus, SessionId, SessionStatus,
    User, UserId, UserStatus, ViewController, WorkerEvent, booking_total,
};
use mealjoin_store::{Collections, MockStore, StoreOptions};
use mealjoin_testkit::{MealFaker, RecordingNotifier};
use time::macros::{date, time};

fn instant_store() -> MockStore {
    MockStore::demo(StoreOptions::instant())
}

fn fetch(store: &MockStore, kind: CollectionKind) -> Result<CollectionSnapshot> {
    store.fetch_collection(kind, &CancelToken::new())
}

#[test]
fn fetch_returns_each_demo_collection() -> Result<()> {
    let store = instant_store();
    for kind in CollectionKind::ALL {
        let snapshot = fetch(&store, kind)?;
        assert_eq!(snapshot.kind(), kind);
        assert!(
            !snapshot.is_empty(),
            "{} should have demo rows",
            kind.as_str()
        );
    }
    Ok(())
}

#[test]
fn suspend_then_activate_round_trips_user_status() -> Result<()> {
    let store = instant_store();
    let cancel = CancelToken::new();
    let target = RecordId::User(UserId::new(1));

    let outcome = store.mutate(target, &ActionKind::Suspend, &cancel)?;
    let MutationOutcome::Updated(Record::User(user)) = outcome else {
        panic!("expected an updated user, got {outcome:?}");
    };
    assert_eq!(user.status, UserStatus::Suspended);

    store.mutate(target, &ActionKind::Activate, &cancel)?;
    let users = store.snapshot()?.users;
    assert_eq!(users[0].status, UserStatus::Active);
    Ok(())
}

#[test]
fn delete_removes_session_and_deactivate_cancels_it() -> Result<()> {
    let store = instant_store();
    let cancel = CancelToken::new();

    let removed = store.mutate(
        RecordId::Session(SessionId::new(2)),
        &ActionKind::Delete,
        &cancel,
    )?;
    assert_eq!(
        removed,
        MutationOutcome::Removed(RecordId::Session(SessionId::new(2)))
    );

    store.mutate(
        RecordId::Session(SessionId::new(1)),
        &ActionKind::Deactivate,
        &cancel,
    )?;
    let sessions = store.snapshot()?.sessions;
    assert_eq!(sessions.len(), 4);
    assert!(
        sessions
            .iter()
            .all(|session| session.id != SessionId::new(2))
    );
    assert_eq!(sessions[0].status, SessionStatus::Cancelled);
    Ok(())
}

#[test]
fn resolve_marks_report_resolved() -> Result<()> {
    let store = instant_store();
    store.mutate(
        RecordId::Report(ReportId::new(1)),
        &ActionKind::Resolve,
        &CancelToken::new(),
    )?;
    let reports = store.snapshot()?.reports;
    assert_eq!(reports[0].status, ReportStatus::Resolved);
    Ok(())
}

#[test]
fn reply_appends_message_and_updates_preview() -> Result<()> {
    let store = instant_store();
    let outcome = store.mutate(
        RecordId::Conversation(ConversationId::new(1)),
        &ActionKind::Reply {
            body: "  See you at 6:30!  ".to_owned(),
        },
        &CancelToken::new(),
    )?;
    let MutationOutcome::Updated(Record::Conversation(conversation)) = outcome else {
        panic!("expected an updated conversation, got {outcome:?}");
    };
    let last = conversation.messages.last().expect("appended message");
    assert_eq!(last.body, "See you at 6:30!");
    assert!(last.is_own);
    assert_eq!(last.id.get(), 6);
    assert_eq!(conversation.last_message, "See you at 6:30!");
    assert!(!conversation.unread);
    Ok(())
}

#[test]
fn blank_reply_is_rejected() {
    let store = instant_store();
    let error = store
        .mutate(
            RecordId::Conversation(ConversationId::new(1)),
            &ActionKind::Reply {
                body: "   ".to_owned(),
            },
            &CancelToken::new(),
        )
        .expect_err("blank reply");
    assert!(error.to_string().contains("empty"));
}

#[test]
fn missing_target_fails_without_mutation() -> Result<()> {
    let store = instant_store();
    let before = store.snapshot()?;
    let error = store
        .mutate(
            RecordId::User(UserId::new(99)),
            &ActionKind::Suspend,
            &CancelToken::new(),
        )
        .expect_err("unknown user");
    assert!(error.to_string().contains("no longer exists"));
    assert_eq!(store.snapshot()?, before);
    Ok(())
}

#[test]
fn mismatched_action_is_rejected() {
    let store = instant_store();
    let error = store
        .mutate(
            RecordId::User(UserId::new(1)),
            &ActionKind::Resolve,
            &CancelToken::new(),
        )
        .expect_err("resolve on a user");
    assert!(error.to_string().contains("cannot resolve a user"));
}

#[test]
fn injected_failures_surface_as_errors() {
    let store = MockStore::demo(StoreOptions {
        fail_fetches: true,
        fail_mutations: true,
        ..StoreOptions::instant()
    });
    let fetch_error = fetch(&store, CollectionKind::Users).expect_err("fetch fails");
    assert_eq!(fetch_error.to_string(), "failed to load users");
    assert!(
        store
            .mutate(
                RecordId::User(UserId::new(1)),
                &ActionKind::Suspend,
                &CancelToken::new(),
            )
            .is_err()
    );
}

#[test]
fn cancelled_fetch_returns_early() {
    let store = MockStore::demo(StoreOptions {
        latency: Duration::from_secs(30),
        ..StoreOptions::instant()
    });
    let cancel = CancelToken::new();
    let worker = {
        let cancel = cancel.clone();
        let store = Arc::new(store);
        thread::spawn(move || store.fetch_collection(CollectionKind::Meals, &cancel))
    };
    let started = Instant::now();
    cancel.cancel();
    let result = worker.join().expect("worker thread");
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn booking_decrements_spots_and_issues_reference() -> Result<()> {
    let store = instant_store();
    let request = BookingRequest {
        meal_id: MealId::new(1),
        meal_title: "Traditional Jollof Rice Feast".to_owned(),
        guest_name: "Ama Serwaa".to_owned(),
        email: "ama@example.com".to_owned(),
        phone: "+233 20 000 0000".to_owned(),
        special_requests: String::new(),
        guests: 2,
        total_pesewas: booking_total(7_000, 2),
    };
    let record = store.submit(&FormPayload::Booking(request), &CancelToken::new())?;
    let Record::Booking(booking) = record else {
        panic!("expected a booking, got {record:?}");
    };
    assert_eq!(booking.amount_pesewas, 15_400);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert!(booking.reference.starts_with("MJ-"));
    assert_eq!(booking.reference.len(), 9);

    let data = store.snapshot()?;
    assert_eq!(data.meals[0].spots_left, 1);
    assert_eq!(data.bookings.len(), 3);
    Ok(())
}

#[test]
fn overbooking_is_rejected() {
    let store = instant_store();
    let request = BookingRequest {
        meal_id: MealId::new(2),
        meal_title: "Homemade Banku & Tilapia".to_owned(),
        guest_name: "Chen Wei".to_owned(),
        email: "chen@example.com".to_owned(),
        phone: "0200000000".to_owned(),
        special_requests: String::new(),
        guests: 3,
        total_pesewas: booking_total(8_500, 3),
    };
    let error = store
        .submit(&FormPayload::Booking(request), &CancelToken::new())
        .expect_err("only two spots");
    assert!(error.to_string().contains("only 2 spots left"));
}

#[test]
fn create_meal_and_complaint_add_records() -> Result<()> {
    let store = instant_store();
    let cancel = CancelToken::new();
    let new_meal = NewMeal {
        host_name: "Kevin Asante".to_owned(),
        basics: MealBasics {
            title: "Waakye Brunch".to_owned(),
            description: "Rice and beans with shito".to_owned(),
            category: MealCategory::Breakfast,
            cuisine: "Ghanaian".to_owned(),
        },
        ingredients: MealIngredients {
            items: vec!["rice".to_owned(), "beans".to_owned()],
        },
        logistics: MealLogistics {
            price_pesewas: 5_000,
            max_guests: 6,
            date: date!(2025 - 02 - 01),
            time: time!(10:00),
            duration: "2 hours".to_owned(),
            location: "Osu".to_owned(),
        },
        guidelines: MealGuidelines::default(),
        photos: MealPhotos::default(),
    };
    let Record::Meal(meal) = store.submit(&FormPayload::CreateMeal(new_meal), &cancel)? else {
        panic!("expected a meal");
    };
    assert_eq!(meal.id, MealId::new(7));
    assert_eq!(meal.spots_left, 6);

    let complaint = ComplaintInput {
        name: "Lisa Williams".to_owned(),
        email: "lisa@example.com".to_owned(),
        phone: String::new(),
        complaint_type: ComplaintType::Hygiene,
        subject: "Dirty kitchen".to_owned(),
        description: "Utensils were not clean.".to_owned(),
        order_id: String::new(),
        host_name: "Chen Wei".to_owned(),
        incident_date: Some(date!(2025 - 01 - 10)),
    };
    let Record::Report(report) = store.submit(&FormPayload::Complaint(complaint), &cancel)? else {
        panic!("expected a report");
    };
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.reported_user, "Chen Wei");
    assert_eq!(report.reason, "Hygiene Concerns");
    assert_eq!(store.snapshot()?.reports.len(), 5);
    Ok(())
}

#[test]
fn store_drives_a_controller_end_to_end() -> Result<()> {
    let users = MealFaker::new(21).users(4);
    let store: Arc<dyn DataSupplier> = Arc::new(MockStore::with_collections(
        Collections {
            users: users.clone(),
            ..Collections::default()
        },
        StoreOptions::instant(),
    ));
    let (tx, rx) = mpsc::channel();
    let mut controller = ViewController::<User>::new();
    let mut notices = RecordingNotifier::new();

    controller.refresh(Arc::clone(&store), tx.clone());
    match rx.recv_timeout(Duration::from_secs(5))? {
        WorkerEvent::Fetched {
            request_id, result, ..
        } => {
            controller.finish_refresh(request_id, result);
        }
        other => panic!("expected a fetch, got {other:?}"),
    }
    assert_eq!(controller.source(), users.as_slice());

    let target = users[1].id;
    let action = if users[1].status == UserStatus::Active {
        ActionKind::Suspend
    } else {
        ActionKind::Activate
    };
    controller.request_action(target, action.clone())?;
    controller.confirm_action(store, tx)?;
    match rx.recv_timeout(Duration::from_secs(5))? {
        WorkerEvent::Mutated {
            request_id, result, ..
        } => {
            assert!(controller.finish_action(request_id, result, &mut notices));
        }
        other => panic!("expected a mutation, got {other:?}"),
    }
    assert_eq!(notices.successes(), vec![action.success_notice()]);
    assert_ne!(
        controller
            .source()
            .iter()
            .find(|user| user.id == target)
            .map(|user| user.status),
        Some(users[1].status)
    );
    Ok(())
}
