// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Demo collections the store starts out with.

use mealjoin_app::{
    Booking, BookingId, BookingStatus, Conversation, ConversationId, Meal, MealCategory, MealId,
    MealSession, Message, MessageId, Report, ReportId, ReportStatus, SessionId, SessionStatus,
    User, UserId, UserStatus,
};
use time::macros::{date, time};
use time::{Date, Time};

/// Host used for the cook dashboard and signed-in cook sessions.
pub const DEMO_COOK: &str = "Kevin Asante";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub meals: Vec<Meal>,
    pub users: Vec<User>,
    pub sessions: Vec<MealSession>,
    pub reports: Vec<Report>,
    pub conversations: Vec<Conversation>,
    pub bookings: Vec<Booking>,
}

impl Collections {
    pub fn demo() -> Self {
        Self {
            meals: demo_meals(),
            users: demo_users(),
            sessions: demo_sessions(),
            reports: demo_reports(),
            conversations: demo_conversations(),
            bookings: demo_bookings(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn meal(
    id: i64,
    host_name: &str,
    title: &str,
    description: &str,
    category: MealCategory,
    price_pesewas: i64,
    location: &str,
    time: Time,
    rating: f64,
    reviews: u32,
    spots_left: u32,
) -> Meal {
    Meal {
        id: MealId::new(id),
        host_name: host_name.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        category,
        price_pesewas,
        location: location.to_owned(),
        time,
        rating,
        reviews,
        spots_left,
    }
}

fn demo_meals() -> Vec<Meal> {
    vec![
        meal(
            1,
            "Kevin Asante",
            "Traditional Jollof Rice Feast",
            "Authentic Ghanaian jollof rice with grilled chicken, coleslaw, and plantain",
            MealCategory::African,
            7_000,
            "Millennium City Estate",
            time!(18:30),
            4.8,
            24,
            3,
        ),
        meal(
            2,
            "Ama Serwaa",
            "Homemade Banku & Tilapia",
            "Fresh tilapia with spicy pepper sauce and traditional banku",
            MealCategory::African,
            8_500,
            "East Legon",
            time!(19:00),
            4.9,
            18,
            2,
        ),
        meal(
            3,
            "James Wilson",
            "Italian Pasta Night",
            "Homemade pasta with marinara sauce, garlic bread, and Caesar salad",
            MealCategory::Continental,
            9_500,
            "Airport Residential",
            time!(19:30),
            4.7,
            31,
            4,
        ),
        meal(
            4,
            "Fatima Abdul",
            "Vegetarian Delight",
            "Mixed vegetable curry with quinoa, fresh salad, and homemade bread",
            MealCategory::Vegetarian,
            6_000,
            "Cantonments",
            time!(18:00),
            4.6,
            15,
            5,
        ),
        meal(
            5,
            "Chen Wei",
            "Asian Fusion Experience",
            "Stir-fried noodles, spring rolls, and sweet & sour chicken",
            MealCategory::Asian,
            8_000,
            "Osu",
            time!(19:15),
            4.8,
            22,
            3,
        ),
        meal(
            6,
            "Kwame Nkrumah",
            "Fufu & Light Soup",
            "Traditional fufu with light soup, goat meat, and assorted",
            MealCategory::African,
            9_000,
            "Dansoman",
            time!(13:00),
            4.9,
            28,
            2,
        ),
    ]
}

fn user(id: i64, name: &str, email: &str, join_date: Date, status: UserStatus) -> User {
    User {
        id: UserId::new(id),
        name: name.to_owned(),
        email: email.to_owned(),
        join_date,
        status,
    }
}

fn demo_users() -> Vec<User> {
    vec![
        user(
            1,
            "Kevin Asante",
            "kevin@example.com",
            date!(2024 - 12 - 01),
            UserStatus::Active,
        ),
        user(
            2,
            "Ama Serwaa",
            "ama@example.com",
            date!(2024 - 11 - 15),
            UserStatus::Active,
        ),
        user(
            3,
            "James Wilson",
            "james@example.com",
            date!(2024 - 10 - 20),
            UserStatus::Suspended,
        ),
        user(
            4,
            "Fatima Abdul",
            "fatima@example.com",
            date!(2024 - 12 - 10),
            UserStatus::Active,
        ),
        user(
            5,
            "Chen Wei",
            "chen@example.com",
            date!(2024 - 09 - 05),
            UserStatus::Active,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn session(
    id: i64,
    host_name: &str,
    event_title: &str,
    date: Date,
    time: Time,
    attendees: u32,
    max_attendees: u32,
    status: SessionStatus,
) -> MealSession {
    MealSession {
        id: SessionId::new(id),
        host_name: host_name.to_owned(),
        event_title: event_title.to_owned(),
        date,
        time,
        attendees,
        max_attendees,
        status,
    }
}

fn demo_sessions() -> Vec<MealSession> {
    vec![
        session(
            1,
            "Kevin Asante",
            "Traditional Jollof Rice Feast",
            date!(2025 - 01 - 15),
            time!(18:30),
            4,
            6,
            SessionStatus::Active,
        ),
        session(
            2,
            "Ama Serwaa",
            "Homemade Banku & Tilapia",
            date!(2025 - 01 - 16),
            time!(19:00),
            2,
            4,
            SessionStatus::Active,
        ),
        session(
            3,
            "James Wilson",
            "Italian Pasta Night",
            date!(2025 - 01 - 12),
            time!(19:30),
            6,
            6,
            SessionStatus::Completed,
        ),
        session(
            4,
            "Fatima Abdul",
            "Vegetarian Delight",
            date!(2025 - 01 - 18),
            time!(18:00),
            3,
            5,
            SessionStatus::Active,
        ),
        session(
            5,
            "Chen Wei",
            "Asian Fusion Experience",
            date!(2025 - 01 - 10),
            time!(19:15),
            0,
            4,
            SessionStatus::Cancelled,
        ),
    ]
}

fn demo_reports() -> Vec<Report> {
    let report = |id: i64,
                  reporter: &str,
                  reported: &str,
                  event: Option<&str>,
                  reason: &str,
                  description: &str,
                  date_reported: Date,
                  status: ReportStatus| Report {
        id: ReportId::new(id),
        reporter_name: reporter.to_owned(),
        reported_user: reported.to_owned(),
        reported_event: event.map(str::to_owned),
        reason: reason.to_owned(),
        description: description.to_owned(),
        date_reported,
        status,
    };
    vec![
        report(
            1,
            "Sarah Johnson",
            "Kevin Asante",
            Some("Traditional Jollof Rice Feast"),
            "Inappropriate behavior",
            "The host was rude to guests and made inappropriate comments during the meal.",
            date!(2025 - 01 - 14),
            ReportStatus::Pending,
        ),
        report(
            2,
            "Michael Chen",
            "Ama Serwaa",
            None,
            "Food safety concerns",
            "The food was not properly cooked and several guests got sick after the meal.",
            date!(2025 - 01 - 13),
            ReportStatus::Pending,
        ),
        report(
            3,
            "Lisa Williams",
            "James Wilson",
            Some("Italian Pasta Night"),
            "No-show host",
            "The host never showed up and left guests waiting for over an hour.",
            date!(2025 - 01 - 12),
            ReportStatus::Resolved,
        ),
        report(
            4,
            "David Brown",
            "Fatima Abdul",
            None,
            "Misleading description",
            "The meal description was completely different from what was served.",
            date!(2025 - 01 - 11),
            ReportStatus::Resolved,
        ),
    ]
}

fn thread(entries: &[(&str, &str, &str)]) -> Vec<Message> {
    entries
        .iter()
        .zip(1i64..)
        .map(|(&(sender, body, time), id)| Message {
            id: MessageId::new(id),
            sender: sender.to_owned(),
            body: body.to_owned(),
            time: time.to_owned(),
            is_own: sender == "You",
        })
        .collect()
}

fn demo_conversations() -> Vec<Conversation> {
    vec![
        Conversation {
            id: ConversationId::new(1),
            name: "Kevin Asante".to_owned(),
            last_message: "Thank you for booking my jollof rice meal!".to_owned(),
            time: "2 hours ago".to_owned(),
            unread: true,
            messages: thread(&[
                (
                    "Kevin Asante",
                    "Hi! Thanks for booking my Traditional Jollof Rice Feast.",
                    "10:30 AM",
                ),
                (
                    "You",
                    "Hi Kevin! I'm really excited about tomorrow's meal.",
                    "10:35 AM",
                ),
                (
                    "Kevin Asante",
                    "Great! Do you have any dietary restrictions I should know about?",
                    "10:40 AM",
                ),
                (
                    "You",
                    "No restrictions, but I prefer mild spice levels.",
                    "10:45 AM",
                ),
                (
                    "Kevin Asante",
                    "Perfect! I'll make sure to adjust the spice level. See you tomorrow at 6:30 PM!",
                    "10:50 AM",
                ),
            ]),
        },
        Conversation {
            id: ConversationId::new(2),
            name: "Ama Serwaa".to_owned(),
            last_message: "The banku was absolutely delicious!".to_owned(),
            time: "1 day ago".to_owned(),
            unread: false,
            messages: thread(&[
                (
                    "Ama Serwaa",
                    "Hi! I wanted to thank you for joining my banku meal last week.",
                    "Yesterday",
                ),
                (
                    "You",
                    "Thank you for having me! The banku was absolutely delicious!",
                    "Yesterday",
                ),
            ]),
        },
        Conversation {
            id: ConversationId::new(3),
            name: "James Wilson".to_owned(),
            last_message: "Looking forward to your next Italian night!".to_owned(),
            time: "3 days ago".to_owned(),
            unread: false,
            messages: thread(&[
                (
                    "James Wilson",
                    "Hey! When are you planning your next Italian pasta night?",
                    "3 days ago",
                ),
                (
                    "You",
                    "I'm thinking next weekend. I'll post it soon!",
                    "3 days ago",
                ),
                (
                    "James Wilson",
                    "Perfect! Looking forward to your next Italian night!",
                    "3 days ago",
                ),
            ]),
        },
    ]
}

fn demo_bookings() -> Vec<Booking> {
    vec![
        Booking {
            id: BookingId::new(1),
            meal_id: Some(MealId::new(1)),
            guest_name: "Ama Serwaa".to_owned(),
            meal_title: "Traditional Jollof Rice Feast".to_owned(),
            date: date!(2025 - 01 - 15),
            time: time!(18:30),
            guests: 2,
            amount_pesewas: 14_000,
            status: BookingStatus::Confirmed,
            reference: "MJ-104512".to_owned(),
        },
        Booking {
            id: BookingId::new(2),
            meal_id: None,
            guest_name: "James Wilson".to_owned(),
            meal_title: "Banku & Tilapia Special".to_owned(),
            date: date!(2025 - 01 - 16),
            time: time!(19:00),
            guests: 1,
            amount_pesewas: 8_500,
            status: BookingStatus::Pending,
            reference: "MJ-208733".to_owned(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::Collections;
    use mealjoin_app::{UserStatus, admin_stats};

    #[test]
    fn demo_data_has_expected_shape() {
        let demo = Collections::demo();
        assert_eq!(demo.meals.len(), 6);
        assert_eq!(demo.users.len(), 5);
        assert_eq!(demo.sessions.len(), 5);
        assert_eq!(demo.reports.len(), 4);
        assert_eq!(demo.conversations.len(), 3);
        assert_eq!(
            demo.users
                .iter()
                .filter(|user| user.status == UserStatus::Suspended)
                .map(|user| user.name.as_str())
                .collect::<Vec<_>>(),
            vec!["James Wilson"]
        );
    }

    #[test]
    fn demo_revenue_matches_session_titles() {
        let demo = Collections::demo();
        let stats = admin_stats(&demo.users, &demo.sessions, &demo.meals);
        // 4 x 70 + 2 x 85 + 6 x 95 + 3 x 60 + 0 x 80 cedis
        assert_eq!(stats.total_revenue_pesewas, 120_000);
        assert_eq!(stats.active_users, 4);
    }
}
