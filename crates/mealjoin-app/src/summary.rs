// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::{
    AdminStats, Booking, BookingStatus, CookStats, Meal, MealSession, User, UserStatus,
};

/// Dashboard totals. Session revenue is attendees times the price of the meal
/// with the same title; sessions without a matching meal contribute nothing.
pub fn admin_stats(users: &[User], sessions: &[MealSession], meals: &[Meal]) -> AdminStats {
    let total_revenue_pesewas = sessions
        .iter()
        .map(|session| {
            meals
                .iter()
                .find(|meal| meal.title.eq_ignore_ascii_case(&session.event_title))
                .map_or(0, |meal| {
                    meal.price_pesewas
                        .saturating_mul(i64::from(session.attendees))
                })
        })
        .fold(0i64, i64::saturating_add);

    AdminStats {
        total_users: users.len(),
        total_sessions: sessions.len(),
        active_users: users
            .iter()
            .filter(|user| user.status == UserStatus::Active)
            .count(),
        total_revenue_pesewas,
    }
}

pub fn cook_stats(host_name: &str, meals: &[Meal], bookings: &[Booking], today: Date) -> CookStats {
    let hosted = meals
        .iter()
        .filter(|meal| meal.host_name == host_name)
        .collect::<Vec<_>>();
    let average_rating = if hosted.is_empty() {
        None
    } else {
        let sum = hosted.iter().map(|meal| meal.rating).sum::<f64>();
        Some(sum / hosted.len() as f64)
    };

    CookStats {
        total_earnings_pesewas: bookings
            .iter()
            .filter(|booking| booking.status == BookingStatus::Confirmed)
            .map(|booking| booking.amount_pesewas)
            .fold(0i64, i64::saturating_add),
        meals_shared: hosted.len(),
        average_rating,
        upcoming_bookings: bookings
            .iter()
            .filter(|booking| booking.date >= today)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::{admin_stats, cook_stats};
    use crate::{
        Booking, BookingId, BookingStatus, Meal, MealCategory, MealId, MealSession, SessionId,
        SessionStatus, User, UserId, UserStatus,
    };
    use time::macros::{date, time};

    fn meal(id: i64, title: &str, host: &str, price: i64, rating: f64) -> Meal {
        Meal {
            id: MealId::new(id),
            host_name: host.to_owned(),
            title: title.to_owned(),
            description: String::new(),
            category: MealCategory::African,
            price_pesewas: price,
            location: "Accra".to_owned(),
            time: time!(18:30),
            rating,
            reviews: 1,
            spots_left: 2,
        }
    }

    fn booking(id: i64, amount: i64, status: BookingStatus, date: time::Date) -> Booking {
        Booking {
            id: BookingId::new(id),
            meal_id: None,
            guest_name: "Guest".to_owned(),
            meal_title: "Jollof".to_owned(),
            date,
            time: time!(18:30),
            guests: 2,
            amount_pesewas: amount,
            status,
            reference: format!("MJ-00000{id}"),
        }
    }

    #[test]
    fn admin_stats_sum_matching_session_revenue() {
        let users = vec![
            User {
                id: UserId::new(1),
                name: "Kevin".to_owned(),
                email: "k@example.com".to_owned(),
                join_date: date!(2024 - 01 - 15),
                status: UserStatus::Active,
            },
            User {
                id: UserId::new(2),
                name: "James".to_owned(),
                email: "j@example.com".to_owned(),
                join_date: date!(2024 - 02 - 15),
                status: UserStatus::Suspended,
            },
        ];
        let meals = vec![meal(1, "Jollof Night", "Kevin", 7_000, 4.8)];
        let session = |id: i64, title: &str, attendees: u32| MealSession {
            id: SessionId::new(id),
            host_name: "Kevin".to_owned(),
            event_title: title.to_owned(),
            date: date!(2024 - 03 - 01),
            time: time!(19:00),
            attendees,
            max_attendees: 8,
            status: SessionStatus::Completed,
        };
        let sessions = vec![session(1, "jollof night", 3), session(2, "Mystery", 5)];

        let stats = admin_stats(&users, &sessions, &meals);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.active_users, 1);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_revenue_pesewas, 21_000);
    }

    #[test]
    fn cook_stats_cover_confirmed_earnings_and_upcoming() {
        let meals = vec![
            meal(1, "Jollof", "Kevin Asante", 7_000, 4.8),
            meal(2, "Fufu", "Kevin Asante", 8_500, 4.6),
            meal(3, "Pasta", "Someone Else", 9_500, 3.0),
        ];
        let bookings = vec![
            booking(1, 14_000, BookingStatus::Confirmed, date!(2025 - 01 - 15)),
            booking(2, 8_500, BookingStatus::Pending, date!(2025 - 01 - 10)),
            booking(3, 7_000, BookingStatus::Confirmed, date!(2024 - 12 - 01)),
        ];
        let stats = cook_stats("Kevin Asante", &meals, &bookings, date!(2025 - 01 - 01));
        assert_eq!(stats.total_earnings_pesewas, 21_000);
        assert_eq!(stats.meals_shared, 2);
        let rating = stats.average_rating.expect("cook has meals");
        assert!((rating - 4.7).abs() < 1e-9);
        assert_eq!(stats.upcoming_bookings, 2);
    }

    #[test]
    fn cook_without_meals_has_no_rating() {
        let stats = cook_stats("Nobody", &[], &[], date!(2025 - 01 - 01));
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.meals_shared, 0);
    }
}
