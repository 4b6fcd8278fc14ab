// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealCategory {
    African,
    Continental,
    Asian,
    Vegetarian,
    Vegan,
    GlutenFree,
    Dessert,
    Breakfast,
}

impl MealCategory {
    pub const ALL: [Self; 8] = [
        Self::African,
        Self::Continental,
        Self::Asian,
        Self::Vegetarian,
        Self::Vegan,
        Self::GlutenFree,
        Self::Dessert,
        Self::Breakfast,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::African => "african",
            Self::Continental => "continental",
            Self::Asian => "asian",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten-free",
            Self::Dessert => "dessert",
            Self::Breakfast => "breakfast",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "african" => Some(Self::African),
            "continental" => Some(Self::Continental),
            "asian" => Some(Self::Asian),
            "vegetarian" => Some(Self::Vegetarian),
            "vegan" => Some(Self::Vegan),
            "gluten-free" => Some(Self::GlutenFree),
            "dessert" => Some(Self::Dessert),
            "breakfast" => Some(Self::Breakfast),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::African => "African",
            Self::Continental => "Continental",
            Self::Asian => "Asian",
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::GlutenFree => "Gluten-Free",
            Self::Dessert => "Dessert",
            Self::Breakfast => "Breakfast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Suspended];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Completed, Self::Cancelled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [Self; 2] = [Self::Pending, Self::Resolved];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Pending,
}

impl BookingStatus {
    pub const ALL: [Self; 2] = [Self::Confirmed, Self::Pending];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(Self::Confirmed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Cook,
    Diner,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cook => "cook",
            Self::Diner => "diner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cook" => Some(Self::Cook),
            "diner" => Some(Self::Diner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintType {
    FoodQuality,
    HostBehavior,
    Hygiene,
    Payment,
    Cancellation,
    Safety,
    Other,
}

impl ComplaintType {
    pub const ALL: [Self; 7] = [
        Self::FoodQuality,
        Self::HostBehavior,
        Self::Hygiene,
        Self::Payment,
        Self::Cancellation,
        Self::Safety,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FoodQuality => "food-quality",
            Self::HostBehavior => "host-behavior",
            Self::Hygiene => "hygiene",
            Self::Payment => "payment",
            Self::Cancellation => "cancellation",
            Self::Safety => "safety",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|complaint| complaint.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FoodQuality => "Food Quality Issues",
            Self::HostBehavior => "Host Behavior",
            Self::Hygiene => "Hygiene Concerns",
            Self::Payment => "Payment Issues",
            Self::Cancellation => "Booking Cancellation",
            Self::Safety => "Safety Concerns",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Collections the data supplier knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Meals,
    Users,
    Sessions,
    Reports,
    Conversations,
    Bookings,
}

impl CollectionKind {
    pub const ALL: [Self; 6] = [
        Self::Meals,
        Self::Users,
        Self::Sessions,
        Self::Reports,
        Self::Conversations,
        Self::Bookings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meals => "meals",
            Self::Users => "users",
            Self::Sessions => "sessions",
            Self::Reports => "reports",
            Self::Conversations => "conversations",
            Self::Bookings => "bookings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Singular noun used in prompts and notices.
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Meals => "meal",
            Self::Users => "user",
            Self::Sessions => "session",
            Self::Reports => "report",
            Self::Conversations => "conversation",
            Self::Bookings => "booking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: MealId,
    pub host_name: String,
    pub title: String,
    pub description: String,
    pub category: MealCategory,
    pub price_pesewas: i64,
    pub location: String,
    pub time: Time,
    pub rating: f64,
    pub reviews: u32,
    pub spots_left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub join_date: Date,
    pub status: UserStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSession {
    pub id: SessionId,
    pub host_name: String,
    pub event_title: String,
    pub date: Date,
    pub time: Time,
    pub attendees: u32,
    pub max_attendees: u32,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub reporter_name: String,
    pub reported_user: String,
    pub reported_event: Option<String>,
    pub reason: String,
    pub description: String,
    pub date_reported: Date,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: String,
    pub body: String,
    pub time: String,
    pub is_own: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub name: String,
    pub last_message: String,
    pub time: String,
    pub unread: bool,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub meal_id: Option<MealId>,
    pub guest_name: String,
    pub meal_title: String,
    pub date: Date,
    pub time: Time,
    pub guests: u32,
    pub amount_pesewas: i64,
    pub status: BookingStatus,
    pub reference: String,
}

/// One fetched collection, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CollectionSnapshot {
    Meals(Vec<Meal>),
    Users(Vec<User>),
    Sessions(Vec<MealSession>),
    Reports(Vec<Report>),
    Conversations(Vec<Conversation>),
    Bookings(Vec<Booking>),
}

impl CollectionSnapshot {
    pub const fn kind(&self) -> CollectionKind {
        match self {
            Self::Meals(_) => CollectionKind::Meals,
            Self::Users(_) => CollectionKind::Users,
            Self::Sessions(_) => CollectionKind::Sessions,
            Self::Reports(_) => CollectionKind::Reports,
            Self::Conversations(_) => CollectionKind::Conversations,
            Self::Bookings(_) => CollectionKind::Bookings,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Meals(rows) => rows.len(),
            Self::Users(rows) => rows.len(),
            Self::Sessions(rows) => rows.len(),
            Self::Reports(rows) => rows.len(),
            Self::Conversations(rows) => rows.len(),
            Self::Bookings(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single record returned by a mutation or a form submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Record {
    Meal(Meal),
    User(User),
    Session(MealSession),
    Report(Report),
    Conversation(Conversation),
    Booking(Booking),
}

impl Record {
    pub const fn kind(&self) -> CollectionKind {
        match self {
            Self::Meal(_) => CollectionKind::Meals,
            Self::User(_) => CollectionKind::Users,
            Self::Session(_) => CollectionKind::Sessions,
            Self::Report(_) => CollectionKind::Reports,
            Self::Conversation(_) => CollectionKind::Conversations,
            Self::Booking(_) => CollectionKind::Bookings,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Self::Meal(meal) => RecordId::Meal(meal.id),
            Self::User(user) => RecordId::User(user.id),
            Self::Session(session) => RecordId::Session(session.id),
            Self::Report(report) => RecordId::Report(report.id),
            Self::Conversation(conversation) => RecordId::Conversation(conversation.id),
            Self::Booking(booking) => RecordId::Booking(booking.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordId {
    Meal(MealId),
    User(UserId),
    Session(SessionId),
    Report(ReportId),
    Conversation(ConversationId),
    Booking(BookingId),
}

impl RecordId {
    pub const fn kind(self) -> CollectionKind {
        match self {
            Self::Meal(_) => CollectionKind::Meals,
            Self::User(_) => CollectionKind::Users,
            Self::Session(_) => CollectionKind::Sessions,
            Self::Report(_) => CollectionKind::Reports,
            Self::Conversation(_) => CollectionKind::Conversations,
            Self::Booking(_) => CollectionKind::Bookings,
        }
    }

    pub const fn raw(self) -> i64 {
        match self {
            Self::Meal(id) => id.get(),
            Self::User(id) => id.get(),
            Self::Session(id) => id.get(),
            Self::Report(id) => id.get(),
            Self::Conversation(id) => id.get(),
            Self::Booking(id) => id.get(),
        }
    }
}

impl From<MealId> for RecordId {
    fn from(value: MealId) -> Self {
        Self::Meal(value)
    }
}

impl From<UserId> for RecordId {
    fn from(value: UserId) -> Self {
        Self::User(value)
    }
}

impl From<SessionId> for RecordId {
    fn from(value: SessionId) -> Self {
        Self::Session(value)
    }
}

impl From<ReportId> for RecordId {
    fn from(value: ReportId) -> Self {
        Self::Report(value)
    }
}

impl From<ConversationId> for RecordId {
    fn from(value: ConversationId) -> Self {
        Self::Conversation(value)
    }
}

impl From<BookingId> for RecordId {
    fn from(value: BookingId) -> Self {
        Self::Booking(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_sessions: usize,
    pub active_users: usize,
    pub total_revenue_pesewas: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CookStats {
    pub total_earnings_pesewas: i64,
    pub meals_shared: usize,
    pub average_rating: Option<f64>,
    pub upcoming_bookings: usize,
}
