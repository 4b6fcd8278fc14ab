// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod supplier;

pub use supplier::{GatedSupplier, RecordingNotifier, ScriptedSupplier};

use anyhow::{Context, Result};
use mealjoin_app::{
    Booking, BookingId, BookingStatus, Conversation, ConversationId, Meal, MealCategory, MealId,
    MealSession, Message, MessageId, Report, ReportId, ReportStatus, SessionId, SessionStatus,
    User, UserId, UserStatus,
};
use std::path::PathBuf;
use time::{Date, Duration, Month, Time};

const FIRST_NAMES: [&str; 16] = [
    "Kwame", "Ama", "Kofi", "Abena", "Yaw", "Akosua", "Kojo", "Efua", "Kwesi", "Adwoa", "Fatima",
    "Ibrahim", "Chen", "James", "Esi", "Nana",
];
const LAST_NAMES: [&str; 14] = [
    "Asante", "Mensah", "Owusu", "Boateng", "Serwaa", "Addo", "Osei", "Darko", "Abdul", "Wei",
    "Wilson", "Agyeman", "Quaye", "Tetteh",
];

const NEIGHBORHOODS: [&str; 12] = [
    "Osu",
    "East Legon",
    "Cantonments",
    "Labone",
    "Airport Residential",
    "Dzorwulu",
    "Adenta",
    "Spintex",
    "Tema Community 25",
    "Achimota",
    "Kokomlemle",
    "Madina",
];

const DISHES: [(&str, MealCategory); 16] = [
    ("Jollof Rice Feast", MealCategory::African),
    ("Waakye Brunch", MealCategory::African),
    ("Fufu and Light Soup", MealCategory::African),
    ("Banku and Tilapia", MealCategory::African),
    ("Red Red Supper", MealCategory::Vegetarian),
    ("Kontomire Stew Night", MealCategory::Vegetarian),
    ("Garden Salad Table", MealCategory::Vegan),
    ("Italian Pasta Night", MealCategory::Continental),
    ("Sunday Roast", MealCategory::Continental),
    ("French Crepes", MealCategory::Breakfast),
    ("Chinese Dumplings", MealCategory::Asian),
    ("Thai Green Curry", MealCategory::Asian),
    ("Sushi Workshop", MealCategory::Asian),
    ("Gluten-Free Bakes", MealCategory::GlutenFree),
    ("Bofrot and Tea", MealCategory::Dessert),
    ("Kelewele Evening", MealCategory::Dessert),
];

const REPORT_REASONS: [&str; 6] = [
    "Inappropriate behavior",
    "Food quality",
    "Hygiene concerns",
    "No-show",
    "Payment dispute",
    "Safety concern",
];

const WORDS: [&str; 24] = [
    "fresh", "homemade", "spicy", "family", "recipe", "pepper", "tomato", "plantain", "rice",
    "shared", "table", "evening", "garden", "grilled", "slow", "cooked", "local", "market",
    "herbs", "ginger", "stew", "friends", "warm", "welcome",
];

/// Start of the window fixtures draw dates from.
const REFERENCE_DATE: (i32, Month, u8) = (2024, Month::January, 1);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for marketplace records. Ids are assigned in sequence
/// per record type, starting at 1.
#[derive(Debug, Clone)]
pub struct MealFaker {
    rng: DeterministicRng,
    seed: u64,
    next_id: i64,
}

impl MealFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            next_id: 0,
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn meal(&mut self) -> Meal {
        let id = self.bump_id();
        let (title, category) = DISHES[self.rng.int_n(DISHES.len())];
        Meal {
            id: MealId::new(id),
            host_name: self.person_name(),
            title: title.to_owned(),
            description: self.sentence(6, 14),
            category,
            // whole cedis between 25 and 150, sometimes with 50 pesewas
            price_pesewas: self.int_range(25, 150) * 100 + if self.rng.bool() { 50 } else { 0 },
            location: format!("{}, Accra", self.pick(&NEIGHBORHOODS)),
            time: self.time_of_day(),
            rating: self.int_range(30, 50) as f64 / 10.0,
            reviews: self.int_range(0, 60) as u32,
            spots_left: self.int_range(0, 8) as u32,
        }
    }

    /// A meal with the given category, for category-filter fixtures.
    pub fn meal_in(&mut self, category: MealCategory) -> Meal {
        Meal {
            category,
            ..self.meal()
        }
    }

    pub fn meals(&mut self, count: usize) -> Vec<Meal> {
        (0..count).map(|_| self.meal()).collect()
    }

    pub fn user(&mut self) -> User {
        let id = self.bump_id();
        let name = self.person_name();
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        User {
            id: UserId::new(id),
            name,
            email,
            join_date: self.date(),
            status: if self.rng.int_n(5) == 0 {
                UserStatus::Suspended
            } else {
                UserStatus::Active
            },
        }
    }

    pub fn users(&mut self, count: usize) -> Vec<User> {
        (0..count).map(|_| self.user()).collect()
    }

    pub fn session(&mut self) -> MealSession {
        let id = self.bump_id();
        let max_attendees = self.int_range(2, 12) as u32;
        let statuses = SessionStatus::ALL;
        MealSession {
            id: SessionId::new(id),
            host_name: self.person_name(),
            event_title: DISHES[self.rng.int_n(DISHES.len())].0.to_owned(),
            date: self.date(),
            time: self.time_of_day(),
            attendees: self.int_range(0, i64::from(max_attendees)) as u32,
            max_attendees,
            status: statuses[self.rng.int_n(statuses.len())],
        }
    }

    pub fn sessions(&mut self, count: usize) -> Vec<MealSession> {
        (0..count).map(|_| self.session()).collect()
    }

    pub fn report(&mut self) -> Report {
        let id = self.bump_id();
        Report {
            id: ReportId::new(id),
            reporter_name: self.person_name(),
            reported_user: self.person_name(),
            reported_event: if self.rng.bool() {
                Some(DISHES[self.rng.int_n(DISHES.len())].0.to_owned())
            } else {
                None
            },
            reason: self.pick(&REPORT_REASONS).to_owned(),
            description: self.sentence(8, 16),
            date_reported: self.date(),
            status: if self.rng.bool() {
                ReportStatus::Pending
            } else {
                ReportStatus::Resolved
            },
        }
    }

    pub fn reports(&mut self, count: usize) -> Vec<Report> {
        (0..count).map(|_| self.report()).collect()
    }

    pub fn conversation(&mut self) -> Conversation {
        let id = self.bump_id();
        let name = self.person_name();
        let count = self.int_range(1, 4) as usize;
        let messages = (0..count)
            .map(|index| {
                let is_own = index % 2 == 1;
                Message {
                    id: MessageId::new(index as i64 + 1),
                    sender: if is_own {
                        "You".to_owned()
                    } else {
                        name.clone()
                    },
                    body: self.sentence(3, 10),
                    time: format!("{}:{:02} PM", self.int_range(1, 11), self.int_range(0, 59)),
                    is_own,
                }
            })
            .collect::<Vec<_>>();
        let last_message = messages
            .last()
            .map(|message| message.body.clone())
            .unwrap_or_default();
        Conversation {
            id: ConversationId::new(id),
            name,
            last_message,
            time: format!("{}h ago", self.int_range(1, 23)),
            unread: self.rng.bool(),
            messages,
        }
    }

    pub fn booking(&mut self) -> Booking {
        let id = self.bump_id();
        let guests = self.int_range(1, 4) as u32;
        Booking {
            id: BookingId::new(id),
            meal_id: None,
            guest_name: self.person_name(),
            meal_title: DISHES[self.rng.int_n(DISHES.len())].0.to_owned(),
            date: self.date(),
            time: self.time_of_day(),
            guests,
            amount_pesewas: self.int_range(25, 150) * 100 * i64::from(guests),
            status: if self.rng.bool() {
                BookingStatus::Confirmed
            } else {
                BookingStatus::Pending
            },
            reference: format!("MJ-{:06}", self.rng.next_u64() % 1_000_000),
        }
    }

    /// A free-text search term that occurs in some generated record.
    pub fn search_term(&mut self) -> String {
        let word = self.pick(&WORDS);
        let take = 2 + self.rng.int_n(word.len().saturating_sub(1));
        let fragment = word.chars().take(take).collect::<String>();
        if self.rng.bool() {
            fragment.to_uppercase()
        } else {
            fragment
        }
    }

    pub fn date(&mut self) -> Date {
        let (year, month, day) = REFERENCE_DATE;
        let start = Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN);
        start + Duration::days(self.int_range(0, 540))
    }

    fn time_of_day(&mut self) -> Time {
        let hour = self.int_range(8, 21) as u8;
        let minute = if self.rng.bool() { 30 } else { 0 };
        Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT)
    }

    fn bump_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = self.int_range(min_words as i64, max_words as i64) as usize;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

/// Fixed "today" for date-relative assertions.
pub fn fixture_today() -> Date {
    Date::from_calendar_date(2025, Month::January, 1).unwrap_or(Date::MIN)
}
