// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::view::{FilterValue, ListItem, NoCategory};
use crate::{
    Booking, BookingId, BookingStatus, CollectionKind, CollectionSnapshot, Conversation,
    ConversationId, Meal, MealCategory, MealId, MealSession, Record, Report, ReportId,
    ReportStatus, SessionId, SessionStatus, User, UserId, UserStatus,
};

macro_rules! filter_value_from_inherent {
    ($ty:ty) => {
        impl FilterValue for $ty {
            const ALL: &'static [Self] = &<$ty>::ALL;

            fn as_str(self) -> &'static str {
                <$ty>::as_str(self)
            }

            fn parse(raw: &str) -> Option<Self> {
                <$ty>::parse(raw)
            }
        }
    };
}

filter_value_from_inherent!(MealCategory);
filter_value_from_inherent!(UserStatus);
filter_value_from_inherent!(SessionStatus);
filter_value_from_inherent!(ReportStatus);
filter_value_from_inherent!(BookingStatus);

macro_rules! sort_keys {
    ($name:ident { $($variant:ident => $raw:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl FilterValue for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $raw),+
                }
            }
        }
    };
}

sort_keys!(MealSortKey {
    Price => "price",
    Rating => "rating",
    SpotsLeft => "spots",
    Title => "title",
});

sort_keys!(UserSortKey {
    JoinDate => "joined",
    Name => "name",
});

sort_keys!(SessionSortKey {
    Date => "date",
    Attendees => "attendees",
    Title => "title",
});

sort_keys!(ReportSortKey {
    DateReported => "reported",
    Reporter => "reporter",
});

sort_keys!(ConversationSortKey {
    Name => "name",
    Unread => "unread",
});

sort_keys!(BookingSortKey {
    Date => "date",
    Amount => "amount",
});

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

impl ListItem for Meal {
    type Id = MealId;
    type Category = MealCategory;
    type SortKey = MealSortKey;

    const COLLECTION: CollectionKind = CollectionKind::Meals;

    fn id(&self) -> MealId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.host_name.as_str(),
            self.location.as_str(),
            self.description.as_str(),
        ]
    }

    fn category(&self) -> Option<MealCategory> {
        Some(self.category)
    }

    fn compare_by(&self, other: &Self, key: MealSortKey) -> Ordering {
        match key {
            MealSortKey::Price => self.price_pesewas.cmp(&other.price_pesewas),
            MealSortKey::Rating => self.rating.total_cmp(&other.rating),
            MealSortKey::SpotsLeft => self.spots_left.cmp(&other.spots_left),
            MealSortKey::Title => compare_text(&self.title, &other.title),
        }
    }

    fn display_label(&self) -> &str {
        &self.title
    }

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>> {
        match snapshot {
            CollectionSnapshot::Meals(rows) => Some(rows),
            _ => None,
        }
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Meal(meal) => Some(meal),
            _ => None,
        }
    }
}

impl ListItem for User {
    type Id = UserId;
    type Category = UserStatus;
    type SortKey = UserSortKey;

    const COLLECTION: CollectionKind = CollectionKind::Users;

    fn id(&self) -> UserId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn category(&self) -> Option<UserStatus> {
        Some(self.status)
    }

    fn compare_by(&self, other: &Self, key: UserSortKey) -> Ordering {
        match key {
            UserSortKey::JoinDate => self.join_date.cmp(&other.join_date),
            UserSortKey::Name => compare_text(&self.name, &other.name),
        }
    }

    fn display_label(&self) -> &str {
        &self.name
    }

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>> {
        match snapshot {
            CollectionSnapshot::Users(rows) => Some(rows),
            _ => None,
        }
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::User(user) => Some(user),
            _ => None,
        }
    }
}

impl ListItem for MealSession {
    type Id = SessionId;
    type Category = SessionStatus;
    type SortKey = SessionSortKey;

    const COLLECTION: CollectionKind = CollectionKind::Sessions;

    fn id(&self) -> SessionId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.event_title.as_str(), self.host_name.as_str()]
    }

    fn category(&self) -> Option<SessionStatus> {
        Some(self.status)
    }

    fn compare_by(&self, other: &Self, key: SessionSortKey) -> Ordering {
        match key {
            SessionSortKey::Date => (self.date, self.time).cmp(&(other.date, other.time)),
            SessionSortKey::Attendees => self.attendees.cmp(&other.attendees),
            SessionSortKey::Title => compare_text(&self.event_title, &other.event_title),
        }
    }

    fn display_label(&self) -> &str {
        &self.event_title
    }

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>> {
        match snapshot {
            CollectionSnapshot::Sessions(rows) => Some(rows),
            _ => None,
        }
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Session(session) => Some(session),
            _ => None,
        }
    }
}

impl ListItem for Report {
    type Id = ReportId;
    type Category = ReportStatus;
    type SortKey = ReportSortKey;

    const COLLECTION: CollectionKind = CollectionKind::Reports;

    fn id(&self) -> ReportId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.reporter_name.as_str(),
            self.reported_user.as_str(),
            self.reason.as_str(),
        ]
    }

    fn category(&self) -> Option<ReportStatus> {
        Some(self.status)
    }

    fn compare_by(&self, other: &Self, key: ReportSortKey) -> Ordering {
        match key {
            ReportSortKey::DateReported => self.date_reported.cmp(&other.date_reported),
            ReportSortKey::Reporter => compare_text(&self.reporter_name, &other.reporter_name),
        }
    }

    fn display_label(&self) -> &str {
        &self.reason
    }

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>> {
        match snapshot {
            CollectionSnapshot::Reports(rows) => Some(rows),
            _ => None,
        }
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Report(report) => Some(report),
            _ => None,
        }
    }
}

impl ListItem for Conversation {
    type Id = ConversationId;
    type Category = NoCategory;
    type SortKey = ConversationSortKey;

    const COLLECTION: CollectionKind = CollectionKind::Conversations;

    fn id(&self) -> ConversationId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn category(&self) -> Option<NoCategory> {
        None
    }

    fn compare_by(&self, other: &Self, key: ConversationSortKey) -> Ordering {
        match key {
            ConversationSortKey::Name => compare_text(&self.name, &other.name),
            // unread first when ascending
            ConversationSortKey::Unread => other.unread.cmp(&self.unread),
        }
    }

    fn display_label(&self) -> &str {
        &self.name
    }

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>> {
        match snapshot {
            CollectionSnapshot::Conversations(rows) => Some(rows),
            _ => None,
        }
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Conversation(conversation) => Some(conversation),
            _ => None,
        }
    }
}

impl ListItem for Booking {
    type Id = BookingId;
    type Category = BookingStatus;
    type SortKey = BookingSortKey;

    const COLLECTION: CollectionKind = CollectionKind::Bookings;

    fn id(&self) -> BookingId {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.guest_name.as_str(),
            self.meal_title.as_str(),
            self.reference.as_str(),
        ]
    }

    fn category(&self) -> Option<BookingStatus> {
        Some(self.status)
    }

    fn compare_by(&self, other: &Self, key: BookingSortKey) -> Ordering {
        match key {
            BookingSortKey::Date => (self.date, self.time).cmp(&(other.date, other.time)),
            BookingSortKey::Amount => self.amount_pesewas.cmp(&other.amount_pesewas),
        }
    }

    fn display_label(&self) -> &str {
        &self.guest_name
    }

    fn from_snapshot(snapshot: CollectionSnapshot) -> Option<Vec<Self>> {
        match snapshot {
            CollectionSnapshot::Bookings(rows) => Some(rows),
            _ => None,
        }
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Booking(booking) => Some(booking),
            _ => None,
        }
    }
}
