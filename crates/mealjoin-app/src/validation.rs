// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::macros::format_description;
use time::{Date, Time};

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";
pub const CURRENCY: &str = "GHC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidMoney,
    NegativeMoney,
    InvalidDate,
    InvalidCount,
    InvalidTime,
    InvalidEmail,
    InvalidCardNumber,
    InvalidExpiry,
    InvalidCvv,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMoney => f.write_str("invalid money value"),
            Self::NegativeMoney => f.write_str("negative money value"),
            Self::InvalidDate => f.write_str("invalid date value"),
            Self::InvalidCount => f.write_str("invalid count"),
            Self::InvalidTime => f.write_str("invalid time of day"),
            Self::InvalidEmail => f.write_str("Please enter a valid email address"),
            Self::InvalidCardNumber => f.write_str("invalid card number"),
            Self::InvalidExpiry => f.write_str("invalid expiry date"),
            Self::InvalidCvv => f.write_str("invalid CVV"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn parse_required_pesewas(input: &str) -> ValidationResult<i64> {
    parse_pesewas(input.trim())
}

pub fn parse_optional_pesewas(input: &str) -> ValidationResult<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_pesewas(trimmed).map(Some)
}

/// `7000` -> `GHC 70.00`.
pub fn format_pesewas(pesewas: i64) -> String {
    let (sign, pesewas) = normalize_sign(pesewas);
    let cedis = pesewas / 100;
    let remainder = pesewas % 100;
    format!("{sign}{CURRENCY} {}.{:02}", comma_format(cedis), remainder)
}

pub fn format_compact_pesewas(pesewas: i64) -> String {
    let (sign, pesewas) = normalize_sign(pesewas);
    let cedis = (pesewas as f64) / 100.0;
    if cedis < 1000.0 {
        return format!("{sign}{}", format_pesewas(pesewas));
    }

    let (value, suffix) = if cedis < 1_000_000.0 {
        (cedis / 1000.0, "k")
    } else {
        (cedis / 1_000_000.0, "M")
    };

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract().abs() < f64::EPSILON {
        format!("{sign}{CURRENCY} {rounded:.0}{suffix}")
    } else {
        format!("{sign}{CURRENCY} {rounded:.1}{suffix}")
    }
}

pub fn parse_required_date(input: &str) -> ValidationResult<Date> {
    parse_date(input.trim())
}

pub fn parse_optional_date(input: &str) -> ValidationResult<Option<Date>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_date(trimmed).map(Some)
}

pub fn format_date(value: Date) -> String {
    let year = value.year();
    let month = value.month() as u8;
    let day = value.day();
    format!("{year:04}-{month:02}-{day:02}")
}

/// Counts such as guests or attendees; must be at least one.
pub fn parse_positive_count(input: &str) -> ValidationResult<u32> {
    let value = input
        .trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidCount)?;
    if value == 0 {
        return Err(ValidationError::InvalidCount);
    }
    Ok(value)
}

/// Accepts `6:30 PM`, `6:30pm`, `18:30` and `7 PM`.
pub fn parse_clock_time(input: &str) -> ValidationResult<Time> {
    let trimmed = input.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = trimmed.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = trimmed.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (trimmed.as_str(), None)
    };

    let (hour_raw, minute_raw) = clock.split_once(':').unwrap_or((clock, "0"));
    if hour_raw.is_empty() || minute_raw.len() > 2 {
        return Err(ValidationError::InvalidTime);
    }
    let hour = hour_raw
        .parse::<u8>()
        .map_err(|_| ValidationError::InvalidTime)?;
    let minute = minute_raw
        .parse::<u8>()
        .map_err(|_| ValidationError::InvalidTime)?;

    let hour = match meridiem {
        None => hour,
        Some(_) if hour == 0 || hour > 12 => return Err(ValidationError::InvalidTime),
        Some(false) => hour % 12,
        Some(true) => hour % 12 + 12,
    };
    Time::from_hms(hour, minute, 0).map_err(|_| ValidationError::InvalidTime)
}

/// `18:30` -> `6:30 PM`.
pub fn format_clock_time(value: Time) -> String {
    let (hour, meridiem) = match value.hour() {
        0 => (12, "AM"),
        hour @ 1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        hour => (hour - 12, "PM"),
    };
    format!("{hour}:{:02} {meridiem}", value.minute())
}

/// One `@`, no whitespace, and a dot inside the domain.
pub fn is_valid_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

pub fn parse_card_number(input: &str) -> ValidationResult<String> {
    let digits = input
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .collect::<String>();
    if !(13..=19).contains(&digits.len()) || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::InvalidCardNumber);
    }
    Ok(digits)
}

/// `MM/YY` with a real month.
pub fn validate_card_expiry(input: &str) -> ValidationResult<()> {
    let (month, year) = input
        .trim()
        .split_once('/')
        .ok_or(ValidationError::InvalidExpiry)?;
    let two_digits = |raw: &str| raw.len() == 2 && raw.bytes().all(|byte| byte.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(ValidationError::InvalidExpiry);
    }
    match month.parse::<u8>() {
        Ok(1..=12) => Ok(()),
        _ => Err(ValidationError::InvalidExpiry),
    }
}

pub fn validate_cvv(input: &str) -> ValidationResult<()> {
    let trimmed = input.trim();
    if (3..=4).contains(&trimmed.len()) && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCvv)
    }
}

fn parse_pesewas(input: &str) -> ValidationResult<i64> {
    let stripped = input
        .strip_prefix(CURRENCY)
        .or_else(|| input.strip_prefix("GH₵"))
        .unwrap_or(input)
        .trim();
    let clean = stripped.replace(',', "");
    if clean.starts_with('-') {
        return Err(ValidationError::NegativeMoney);
    }
    if clean.is_empty() {
        return Err(ValidationError::InvalidMoney);
    }

    let (whole_raw, frac_raw) = match clean.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (clean.as_str(), None),
    };

    let whole = parse_digits(whole_raw, true)?;
    if whole > i64::MAX / 100 {
        return Err(ValidationError::InvalidMoney);
    }

    let mut frac = 0i64;
    if let Some(frac_raw) = frac_raw {
        if frac_raw.len() > 2 {
            return Err(ValidationError::InvalidMoney);
        }
        frac = parse_digits(frac_raw, false)?;
        if frac_raw.len() == 1 {
            frac *= 10;
        }
    }

    whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(frac))
        .ok_or(ValidationError::InvalidMoney)
}

fn parse_digits(input: &str, allow_empty: bool) -> ValidationResult<i64> {
    if input.is_empty() {
        if allow_empty {
            return Ok(0);
        }
        return Err(ValidationError::InvalidMoney);
    }
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::InvalidMoney);
    }
    input
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidMoney)
}

fn parse_date(input: &str) -> ValidationResult<Date> {
    Date::parse(input, &format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate)
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn normalize_sign(pesewas: i64) -> (&'static str, i64) {
    if pesewas >= 0 {
        return ("", pesewas);
    }
    if pesewas == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -pesewas)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ValidationError, format_clock_time, format_compact_pesewas, format_date, format_pesewas,
        is_valid_email, parse_card_number, parse_clock_time, parse_optional_pesewas,
        parse_positive_count, parse_required_date, parse_required_pesewas, validate_card_expiry,
        validate_cvv,
    };
    use std::collections::BTreeMap;
    use time::macros::{date, time};

    #[test]
    fn parse_required_pesewas_accepts_display_forms() {
        let cases = BTreeMap::from([
            ("70", 7_000),
            ("70.5", 7_050),
            ("GHC 70.00", 7_000),
            ("GH₵45.00", 4_500),
            ("1,234.56", 123_456),
            (".75", 75),
        ]);
        for (input, expected) in cases {
            let got = parse_required_pesewas(input).expect("money should parse");
            assert_eq!(got, expected, "input {input}");
        }
    }

    #[test]
    fn parse_required_pesewas_rejects_garbage() {
        for input in ["", "12.345", "abc", "1.2.3", "GHC"] {
            assert!(parse_required_pesewas(input).is_err(), "input {input}");
        }
        assert_eq!(
            parse_required_pesewas("-5"),
            Err(ValidationError::NegativeMoney)
        );
    }

    #[test]
    fn optional_pesewas_allows_blank() {
        assert_eq!(parse_optional_pesewas("  "), Ok(None));
        assert_eq!(parse_optional_pesewas("5"), Ok(Some(500)));
    }

    #[test]
    fn format_pesewas_matches_listing_style() {
        assert_eq!(format_pesewas(7_000), "GHC 70.00");
        assert_eq!(format_pesewas(1_542_050), "GHC 15,420.50");
        assert_eq!(format_pesewas(-250), "-GHC 2.50");
        assert_eq!(format_pesewas(0), "GHC 0.00");
    }

    #[test]
    fn format_compact_pesewas_abbreviates_large_values() {
        assert_eq!(format_compact_pesewas(9_999), "GHC 99.99");
        assert_eq!(format_compact_pesewas(1_542_050), "GHC 15.4k");
        assert_eq!(format_compact_pesewas(200_000_000), "GHC 2M");
    }

    #[test]
    fn dates_parse_and_format() {
        let parsed = parse_required_date(" 2024-01-15 ").expect("date should parse");
        assert_eq!(parsed, date!(2024 - 01 - 15));
        assert_eq!(format_date(parsed), "2024-01-15");
        assert_eq!(
            parse_required_date("15/01/2024"),
            Err(ValidationError::InvalidDate)
        );
    }

    #[test]
    fn counts_must_be_positive() {
        assert_eq!(parse_positive_count("3"), Ok(3));
        assert_eq!(
            parse_positive_count("0"),
            Err(ValidationError::InvalidCount)
        );
        assert_eq!(
            parse_positive_count("-1"),
            Err(ValidationError::InvalidCount)
        );
        assert_eq!(parse_positive_count(""), Err(ValidationError::InvalidCount));
    }

    #[test]
    fn clock_times_accept_twelve_and_twenty_four_hour_forms() {
        assert_eq!(parse_clock_time("6:30 PM"), Ok(time!(18:30)));
        assert_eq!(parse_clock_time("12:00 pm"), Ok(time!(12:00)));
        assert_eq!(parse_clock_time("12:15 AM"), Ok(time!(00:15)));
        assert_eq!(parse_clock_time("7 PM"), Ok(time!(19:00)));
        assert_eq!(parse_clock_time("18:30"), Ok(time!(18:30)));
        assert_eq!(
            parse_clock_time("13:00 PM"),
            Err(ValidationError::InvalidTime)
        );
        assert_eq!(parse_clock_time("25:00"), Err(ValidationError::InvalidTime));
        assert_eq!(format_clock_time(time!(18:30)), "6:30 PM");
        assert_eq!(format_clock_time(time!(00:05)), "12:05 AM");
        assert_eq!(format_clock_time(time!(12:00)), "12:00 PM");
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("admin@mealjoin.com"));
        assert!(is_valid_email("a.b@c.co"));
        let invalid = ["", "plain", "a@b", "a @b.com", "@b.com"];
        let more_invalid = ["a@.com", "a@b.", "a@b@c.com"];
        for input in invalid.into_iter().chain(more_invalid) {
            assert!(!is_valid_email(input), "input {input}");
        }
    }

    #[test]
    fn card_fields() {
        assert_eq!(
            parse_card_number("4111 1111 1111 1111"),
            Ok("4111111111111111".to_owned())
        );
        assert!(parse_card_number("4111").is_err());
        assert!(parse_card_number("4111 1111 1111 111x").is_err());
        assert!(validate_card_expiry("08/27").is_ok());
        assert!(validate_card_expiry("13/27").is_err());
        assert!(validate_card_expiry("8/27").is_err());
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("12").is_err());
    }
}
