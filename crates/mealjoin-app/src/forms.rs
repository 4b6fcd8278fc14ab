// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::validation::{
    DATE_LAYOUT, is_valid_email, parse_card_number, parse_clock_time, parse_optional_date,
    parse_positive_count, parse_required_date, parse_required_pesewas, validate_card_expiry,
    validate_cvv,
};
use crate::{ComplaintType, Meal, MealCategory, MealId, Role};

pub const MIN_PASSWORD_LEN: usize = 6;
/// Service fee on bookings, in tenths (11 = x1.1).
const BOOKING_FEE_TENTHS: i64 = 11;
const LIST_SEPARATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    AdminLogin,
    SignIn,
    CreateMeal,
    Booking,
    Complaint,
}

impl FormKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AdminLogin => "admin login",
            Self::SignIn => "sign in",
            Self::CreateMeal => "create meal",
            Self::Booking => "booking",
            Self::Complaint => "complaint",
        }
    }
}

/// Inline messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn merge(&mut self, other: Self) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealBasics {
    pub title: String,
    pub description: String,
    pub category: MealCategory,
    pub cuisine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealIngredients {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealLogistics {
    pub price_pesewas: i64,
    pub max_guests: u32,
    pub date: Date,
    pub time: Time,
    pub duration: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealGuidelines {
    pub dietary_info: Vec<String>,
    pub house_rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPhotos {
    pub photos: Vec<String>,
}

/// One create-meal submission, composed from the wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeal {
    pub host_name: String,
    pub basics: MealBasics,
    pub ingredients: MealIngredients,
    pub logistics: MealLogistics,
    pub guidelines: MealGuidelines,
    pub photos: MealPhotos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub meal_id: MealId,
    pub meal_title: String,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: String,
    pub guests: u32,
    pub total_pesewas: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub complaint_type: ComplaintType,
    pub subject: String,
    pub description: String,
    pub order_id: String,
    pub host_name: String,
    pub incident_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormPayload {
    CreateMeal(NewMeal),
    Booking(BookingRequest),
    Complaint(ComplaintInput),
}

impl FormPayload {
    pub const fn kind(&self) -> FormKind {
        match self {
            Self::CreateMeal(_) => FormKind::CreateMeal,
            Self::Booking(_) => FormKind::Booking,
            Self::Complaint(_) => FormKind::Complaint,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::CreateMeal(meal) => meal.validate(),
            Self::Booking(booking) => booking.validate(),
            Self::Complaint(complaint) => complaint.validate(),
        }
    }
}

impl NewMeal {
    pub fn validate(&self) -> Result<()> {
        if self.basics.title.trim().is_empty() {
            bail!("meal title is required -- enter a title and retry");
        }
        if self
            .ingredients
            .items
            .iter()
            .all(|item| item.trim().is_empty())
        {
            bail!("meal needs at least one ingredient");
        }
        if self.logistics.price_pesewas <= 0 {
            bail!("meal price must be positive");
        }
        if self.logistics.max_guests == 0 {
            bail!("meal must allow at least one guest");
        }
        if self.logistics.location.trim().is_empty() {
            bail!("meal location is required -- enter a location and retry");
        }
        Ok(())
    }
}

impl BookingRequest {
    pub fn validate(&self) -> Result<()> {
        if self.guests == 0 {
            bail!("booking needs at least one guest");
        }
        if self.guest_name.trim().is_empty() {
            bail!("guest name is required");
        }
        if self.total_pesewas <= 0 {
            bail!("booking total must be positive");
        }
        Ok(())
    }
}

impl ComplaintInput {
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            bail!("complaint subject is required -- enter a subject and retry");
        }
        if self.description.trim().is_empty() {
            bail!("complaint description is required");
        }
        Ok(())
    }
}

/// Price x guests plus the 10% service fee, rounded to the nearest pesewa.
pub fn booking_total(price_pesewas: i64, guests: u32) -> i64 {
    let base = price_pesewas.saturating_mul(i64::from(guests));
    (base.saturating_mul(BOOKING_FEE_TENTHS) + 5) / 10
}

/// `MJ-` followed by the last six digits of a millisecond timestamp.
pub fn booking_reference(unix_millis: i128) -> String {
    format!("MJ-{:06}", unix_millis.rem_euclid(1_000_000))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub secret: bool,
}

const fn field(key: &'static str, label: &'static str, hint: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        hint,
        secret: false,
    }
}

const fn secret(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        hint: "",
        secret: true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStep {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

const ADMIN_LOGIN_STEPS: &[FormStep] = &[FormStep {
    title: "Admin login",
    fields: &[
        field("email", "Email", "admin@mealjoin.com"),
        secret("password", "Password"),
    ],
}];

const SIGN_IN_STEPS: &[FormStep] = &[FormStep {
    title: "Sign in",
    fields: &[
        field("email", "Email", "you@example.com"),
        secret("password", "Password"),
        field("role", "Role", "cook or diner"),
    ],
}];

const CREATE_MEAL_STEPS: &[FormStep] = &[
    FormStep {
        title: "Basic Info",
        fields: &[
            field("title", "Meal title", "Traditional Jollof Rice Feast"),
            field("description", "Description", ""),
            field(
                "category",
                "Category",
                "african, continental, asian, vegetarian, ...",
            ),
            field("cuisine", "Cuisine type", "optional"),
        ],
    },
    FormStep {
        title: "Ingredients",
        fields: &[field("ingredients", "Ingredients", "separate with ;")],
    },
    FormStep {
        title: "Logistics",
        fields: &[
            field("price", "Price per person", "GHC 70.00"),
            field("max_guests", "Max guests", "6"),
            field("date", "Date", DATE_LAYOUT),
            field("time", "Time", "6:30 PM"),
            field("duration", "Duration", "3 hours"),
            field("location", "Location", "East Legon, Accra"),
        ],
    },
    FormStep {
        title: "Guidelines",
        fields: &[
            field("dietary_info", "Dietary information", "separate with ;"),
            field("house_rules", "House rules", "separate with ;"),
        ],
    },
    FormStep {
        title: "Photos",
        fields: &[field("photos", "Photos", "file names, separate with ;")],
    },
];

const BOOKING_STEPS: &[FormStep] = &[
    FormStep {
        title: "Guest details",
        fields: &[
            field("guests", "Guests", "1"),
            field("first_name", "First name", ""),
            field("last_name", "Last name", ""),
            field("email", "Email", "you@example.com"),
            field("phone", "Phone", "+233 ..."),
            field("special_requests", "Special requests", "optional"),
        ],
    },
    FormStep {
        title: "Payment",
        fields: &[
            field("card_number", "Card number", "1234 5678 9012 3456"),
            field("card_expiry", "Expiry", "MM/YY"),
            secret("card_cvv", "CVV"),
            field("card_name", "Name on card", ""),
        ],
    },
];

const COMPLAINT_STEPS: &[FormStep] = &[FormStep {
    title: "File a complaint",
    fields: &[
        field("name", "Full name", ""),
        field("email", "Email", "you@example.com"),
        field("phone", "Phone", "optional"),
        field(
            "complaint_type",
            "Complaint type",
            "food-quality, host-behavior, hygiene, payment, cancellation, safety, other",
        ),
        field("subject", "Subject", ""),
        field("description", "Description", ""),
        field("order_id", "Booking reference", "optional"),
        field("host_name", "Host name", "optional"),
        field("incident_date", "Incident date", "optional, YYYY-MM-DD"),
    ],
}];

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutput {
    AdminLogin(LoginInput),
    SignIn(SignInInput),
    Submit(FormPayload),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftProgress {
    NextStep(usize),
    Complete(FormOutput),
}

/// Text-level state of one open form: raw field values, the current step
/// and the focused field. Typed values only exist once a step validates.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    kind: FormKind,
    steps: &'static [FormStep],
    step: usize,
    focus: usize,
    values: BTreeMap<&'static str, String>,
    errors: FieldErrors,
    host_name: String,
    meal: Option<Meal>,
}

impl FormDraft {
    fn with_steps(kind: FormKind, steps: &'static [FormStep]) -> Self {
        Self {
            kind,
            steps,
            step: 0,
            focus: 0,
            values: BTreeMap::new(),
            errors: FieldErrors::default(),
            host_name: String::new(),
            meal: None,
        }
    }

    pub fn admin_login() -> Self {
        Self::with_steps(FormKind::AdminLogin, ADMIN_LOGIN_STEPS)
    }

    pub fn sign_in() -> Self {
        let mut draft = Self::with_steps(FormKind::SignIn, SIGN_IN_STEPS);
        draft.set("role", Role::Diner.as_str());
        draft
    }

    /// The meal-creation wizard for `host_name`.
    pub fn create_meal(host_name: impl Into<String>) -> Self {
        let mut draft = Self::with_steps(FormKind::CreateMeal, CREATE_MEAL_STEPS);
        draft.host_name = host_name.into();
        draft
    }

    pub fn booking(meal: Meal) -> Self {
        let mut draft = Self::with_steps(FormKind::Booking, BOOKING_STEPS);
        draft.set("guests", "1");
        draft.meal = Some(meal);
        draft
    }

    pub fn complaint() -> Self {
        Self::with_steps(FormKind::Complaint, COMPLAINT_STEPS)
    }

    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn meal(&self) -> Option<&Meal> {
        self.meal.as_ref()
    }

    pub const fn step_index(&self) -> usize {
        self.step
    }

    pub const fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self) -> &'static FormStep {
        let steps = self.steps;
        &steps[self.step.min(steps.len().saturating_sub(1))]
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.steps.len()
    }

    pub fn focused_field(&self) -> &'static FieldSpec {
        let fields = self.step().fields;
        &fields[self.focus.min(fields.len().saturating_sub(1))]
    }

    pub const fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        let len = self.step().fields.len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.step().fields.len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Sets a field; typing into a field clears its inline error.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
        self.errors.remove(key);
    }

    pub fn push_char(&mut self, ch: char) {
        let key = self.focused_field().key;
        self.values.entry(key).or_default().push(ch);
        self.errors.remove(key);
    }

    pub fn pop_char(&mut self) {
        let key = self.focused_field().key;
        if let Some(value) = self.values.get_mut(key) {
            value.pop();
        }
        self.errors.remove(key);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Goes back one step without validating.
    pub fn back(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        self.focus = 0;
        true
    }

    /// Validates the current step and moves on, or composes the final output
    /// on the last step.
    pub fn advance(&mut self) -> Result<DraftProgress, FieldErrors> {
        if let Err(errors) = self.check_step(self.step) {
            self.errors = errors.clone();
            return Err(errors);
        }
        self.errors = FieldErrors::default();
        if !self.is_last_step() {
            self.step += 1;
            self.focus = 0;
            return Ok(DraftProgress::NextStep(self.step));
        }
        match self.compose() {
            Ok(output) => Ok(DraftProgress::Complete(output)),
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    fn check_step(&self, step: usize) -> Result<(), FieldErrors> {
        match (self.kind, step) {
            (FormKind::CreateMeal, 0) => self.parse_basics().map(drop),
            (FormKind::CreateMeal, 1) => self.parse_ingredients().map(drop),
            (FormKind::CreateMeal, 2) => self.parse_logistics().map(drop),
            (FormKind::CreateMeal, _) => Ok(()),
            (FormKind::Booking, 0) => self.parse_guest_details().map(drop),
            (FormKind::Booking, _) => self.parse_payment(),
            _ => self.compose().map(drop),
        }
    }

    pub fn compose(&self) -> Result<FormOutput, FieldErrors> {
        match self.kind {
            FormKind::AdminLogin => self.parse_login().map(FormOutput::AdminLogin),
            FormKind::SignIn => self.parse_sign_in().map(FormOutput::SignIn),
            FormKind::CreateMeal => self
                .compose_meal()
                .map(|meal| FormOutput::Submit(FormPayload::CreateMeal(meal))),
            FormKind::Booking => self
                .compose_booking()
                .map(|booking| FormOutput::Submit(FormPayload::Booking(booking))),
            FormKind::Complaint => self
                .parse_complaint()
                .map(|complaint| FormOutput::Submit(FormPayload::Complaint(complaint))),
        }
    }

    fn trimmed(&self, key: &str) -> String {
        self.value(key).trim().to_owned()
    }

    fn required(&self, errors: &mut FieldErrors, key: &'static str, message: &str) -> String {
        let value = self.trimmed(key);
        if value.is_empty() {
            errors.insert(key, message);
        }
        value
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.value(key)
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }

    fn check_email(&self, errors: &mut FieldErrors) -> String {
        let email = self.trimmed("email");
        if email.is_empty() {
            errors.insert("email", "Email is required");
        } else if !is_valid_email(&email) {
            errors.insert("email", "Please enter a valid email address");
        }
        email
    }

    fn check_password(&self, errors: &mut FieldErrors) -> String {
        let password = self.value("password").to_owned();
        if password.is_empty() {
            errors.insert("password", "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        password
    }

    fn parse_login(&self) -> Result<LoginInput, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = self.check_email(&mut errors);
        let password = self.check_password(&mut errors);
        errors.into_result(LoginInput { email, password })
    }

    fn parse_sign_in(&self) -> Result<SignInInput, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = self.check_email(&mut errors);
        let password = self.check_password(&mut errors);
        let role = Role::parse(&self.trimmed("role").to_lowercase());
        if role.is_none() {
            errors.insert("role", "Choose cook or diner");
        }
        match role {
            Some(role) if errors.is_empty() => Ok(SignInInput {
                email,
                password,
                role,
            }),
            _ => Err(errors),
        }
    }

    fn parse_basics(&self) -> Result<MealBasics, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = self.required(&mut errors, "title", "Meal title is required");
        let description = self.required(&mut errors, "description", "Description is required");
        let raw_category = self.trimmed("category");
        let category = parse_category_input(&raw_category);
        if raw_category.is_empty() {
            errors.insert("category", "Category is required");
        } else if category.is_none() {
            errors.insert("category", format!("Unknown category \"{raw_category}\""));
        }
        match category {
            Some(category) if errors.is_empty() => Ok(MealBasics {
                title,
                description,
                category,
                cuisine: self.trimmed("cuisine"),
            }),
            _ => Err(errors),
        }
    }

    fn parse_ingredients(&self) -> Result<MealIngredients, FieldErrors> {
        let items = self.list("ingredients");
        if items.is_empty() {
            let mut errors = FieldErrors::default();
            errors.insert("ingredients", "Add at least one ingredient");
            return Err(errors);
        }
        Ok(MealIngredients { items })
    }

    fn parse_logistics(&self) -> Result<MealLogistics, FieldErrors> {
        let mut errors = FieldErrors::default();
        let price = match parse_required_pesewas(self.value("price")) {
            Ok(value) if value > 0 => Some(value),
            _ => {
                errors.insert("price", "Price must be greater than zero");
                None
            }
        };
        let max_guests = parse_positive_count(self.value("max_guests")).ok();
        if max_guests.is_none() {
            errors.insert("max_guests", "Max guests must be at least 1");
        }
        let date = parse_required_date(self.value("date")).ok();
        if date.is_none() {
            errors.insert("date", format!("Date must be {DATE_LAYOUT}"));
        }
        let time = parse_clock_time(self.value("time")).ok();
        if time.is_none() {
            errors.insert("time", "Time must look like 6:30 PM");
        }
        let duration = self.required(&mut errors, "duration", "Duration is required");
        let location = self.required(&mut errors, "location", "Location is required");
        match (price, max_guests, date, time) {
            (Some(price_pesewas), Some(max_guests), Some(date), Some(time)) => {
                let logistics = MealLogistics {
                    price_pesewas,
                    max_guests,
                    date,
                    time,
                    duration,
                    location,
                };
                errors.into_result(logistics)
            }
            _ => Err(errors),
        }
    }

    fn compose_meal(&self) -> Result<NewMeal, FieldErrors> {
        let mut errors = FieldErrors::default();
        let basics = self.parse_basics().map_err(|e| errors.merge(e)).ok();
        let ingredients = self.parse_ingredients().map_err(|e| errors.merge(e)).ok();
        let logistics = self.parse_logistics().map_err(|e| errors.merge(e)).ok();
        match (basics, ingredients, logistics) {
            (Some(basics), Some(ingredients), Some(logistics)) => Ok(NewMeal {
                host_name: self.host_name.clone(),
                basics,
                ingredients,
                logistics,
                guidelines: MealGuidelines {
                    dietary_info: self.list("dietary_info"),
                    house_rules: self.list("house_rules"),
                },
                photos: MealPhotos {
                    photos: self.list("photos"),
                },
            }),
            _ => Err(errors),
        }
    }

    fn parse_guest_details(&self) -> Result<(u32, String), FieldErrors> {
        let mut errors = FieldErrors::default();
        let spots = self.meal.as_ref().map_or(u32::MAX, |meal| meal.spots_left);
        let guests = match parse_positive_count(self.value("guests")) {
            Ok(count) if count <= spots => Some(count),
            _ => {
                errors.insert("guests", format!("Guests must be between 1 and {spots}"));
                None
            }
        };
        let first = self.required(&mut errors, "first_name", "First name is required");
        let last = self.required(&mut errors, "last_name", "Last name is required");
        self.check_email(&mut errors);
        self.required(&mut errors, "phone", "Phone number is required");
        match guests {
            Some(guests) if errors.is_empty() => Ok((guests, format!("{first} {last}"))),
            _ => Err(errors),
        }
    }

    fn parse_payment(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if parse_card_number(self.value("card_number")).is_err() {
            errors.insert("card_number", "Card number must be 13-19 digits");
        }
        if validate_card_expiry(self.value("card_expiry")).is_err() {
            errors.insert("card_expiry", "Expiry must be MM/YY");
        }
        if validate_cvv(self.value("card_cvv")).is_err() {
            errors.insert("card_cvv", "CVV must be 3 or 4 digits");
        }
        self.required(&mut errors, "card_name", "Name on card is required");
        errors.into_result(())
    }

    fn compose_booking(&self) -> Result<BookingRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        let Some(meal) = self.meal.as_ref() else {
            errors.insert("meal", "Choose a meal to book");
            return Err(errors);
        };
        let details = self.parse_guest_details().map_err(|e| errors.merge(e)).ok();
        if let Err(payment) = self.parse_payment() {
            errors.merge(payment);
        }
        match details {
            Some((guests, guest_name)) if errors.is_empty() => Ok(BookingRequest {
                meal_id: meal.id,
                meal_title: meal.title.clone(),
                guest_name,
                email: self.trimmed("email"),
                phone: self.trimmed("phone"),
                special_requests: self.trimmed("special_requests"),
                guests,
                total_pesewas: booking_total(meal.price_pesewas, guests),
            }),
            _ => Err(errors),
        }
    }

    fn parse_complaint(&self) -> Result<ComplaintInput, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = self.required(&mut errors, "name", "Name is required");
        let email = self.check_email(&mut errors);
        let complaint_type = ComplaintType::parse(&self.trimmed("complaint_type").to_lowercase());
        if complaint_type.is_none() {
            errors.insert("complaint_type", "Choose a complaint type");
        }
        let subject = self.required(&mut errors, "subject", "Subject is required");
        let description = self.required(&mut errors, "description", "Description is required");
        let incident_date = match parse_optional_date(self.value("incident_date")) {
            Ok(date) => date,
            Err(_) => {
                errors.insert(
                    "incident_date",
                    format!("Incident date must be {DATE_LAYOUT}"),
                );
                None
            }
        };
        match complaint_type {
            Some(complaint_type) if errors.is_empty() => Ok(ComplaintInput {
                name,
                email,
                phone: self.trimmed("phone"),
                complaint_type,
                subject,
                description,
                order_id: self.trimmed("order_id"),
                host_name: self.trimmed("host_name"),
                incident_date,
            }),
            _ => Err(errors),
        }
    }
}

/// Accepts the stored value (`gluten-free`) or the display label (`Gluten-Free`).
fn parse_category_input(raw: &str) -> Option<MealCategory> {
    let normalized = raw.trim().to_lowercase().replace(' ', "-");
    MealCategory::parse(&normalized)
}

/// Payment simulation state for one booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingPhase {
    Editing,
    Processing { request_id: u64 },
    Complete {
        reference: String,
        total_pesewas: i64,
    },
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::{
        DraftProgress, FormDraft, FormOutput, FormPayload, booking_reference, booking_total,
    };
    use crate::{ComplaintType, Meal, MealCategory, MealId, Role};
    use time::macros::{date, time};

    fn jollof() -> Meal {
        Meal {
            id: MealId::new(1),
            host_name: "Kevin Asante".to_owned(),
            title: "Traditional Jollof Rice Feast".to_owned(),
            description: String::new(),
            category: MealCategory::African,
            price_pesewas: 7_000,
            location: "Millennium City Estate, Accra".to_owned(),
            time: time!(18:30),
            rating: 4.8,
            reviews: 24,
            spots_left: 3,
        }
    }

    #[test]
    fn booking_total_adds_service_fee() {
        assert_eq!(booking_total(7_000, 1), 7_700);
        assert_eq!(booking_total(7_000, 2), 15_400);
        assert_eq!(booking_total(4_555, 1), 5_011);
    }

    #[test]
    fn booking_reference_keeps_last_six_digits() {
        assert_eq!(booking_reference(1_736_942_400_123), "MJ-400123");
        assert_eq!(booking_reference(1_000_000_042), "MJ-000042");
    }

    #[test]
    fn admin_login_reports_inline_errors() {
        let mut draft = FormDraft::admin_login();
        draft.set("email", "not-an-email");
        draft.set("password", "123");
        let errors = draft.advance().expect_err("invalid form");
        assert_eq!(
            errors.get("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );

        draft.set("email", "");
        assert_eq!(draft.errors().get("email"), None);
        let errors = draft.advance().expect_err("still invalid");
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn sign_in_defaults_to_diner() {
        let mut draft = FormDraft::sign_in();
        draft.set("email", "ama@example.com");
        draft.set("password", "secret1");
        match draft.advance().expect("valid sign in") {
            DraftProgress::Complete(FormOutput::SignIn(input)) => {
                assert_eq!(input.role, Role::Diner);
            }
            other => panic!("unexpected progress {other:?}"),
        }
    }

    #[test]
    fn wizard_validates_each_step_and_backs_up_freely() {
        let mut draft = FormDraft::create_meal("Kevin Asante");
        let errors = draft.advance().expect_err("empty basics");
        assert!(errors.get("title").is_some());
        assert_eq!(draft.step_index(), 0);

        draft.set("title", "Waakye Brunch");
        draft.set("description", "Rice and beans with shito");
        draft.set("category", "Breakfast");
        assert_eq!(draft.advance(), Ok(DraftProgress::NextStep(1)));

        assert!(draft.advance().is_err());
        draft.set("ingredients", "rice; beans; ; shito");
        assert_eq!(draft.advance(), Ok(DraftProgress::NextStep(2)));

        assert!(draft.back());
        assert_eq!(draft.step_index(), 1);
        assert_eq!(draft.advance(), Ok(DraftProgress::NextStep(2)));

        draft.set("price", "GHC 55.00");
        draft.set("max_guests", "6");
        draft.set("date", "2025-01-20");
        draft.set("time", "10:00 AM");
        draft.set("duration", "2 hours");
        draft.set("location", "Osu, Accra");
        assert_eq!(draft.advance(), Ok(DraftProgress::NextStep(3)));
        draft.set("house_rules", "No smoking;");
        assert_eq!(draft.advance(), Ok(DraftProgress::NextStep(4)));

        let progress = draft.advance().expect("final step");
        let DraftProgress::Complete(FormOutput::Submit(FormPayload::CreateMeal(meal))) = progress
        else {
            panic!("expected a create-meal payload");
        };
        assert_eq!(meal.host_name, "Kevin Asante");
        assert_eq!(meal.basics.category, MealCategory::Breakfast);
        assert_eq!(meal.ingredients.items, vec!["rice", "beans", "shito"]);
        assert_eq!(meal.logistics.price_pesewas, 5_500);
        assert_eq!(meal.logistics.date, date!(2025 - 01 - 20));
        assert_eq!(meal.logistics.time, time!(10:00));
        assert_eq!(meal.guidelines.house_rules, vec!["No smoking"]);
        assert!(meal.guidelines.dietary_info.is_empty());
        assert!(meal.photos.photos.is_empty());
        assert!(FormPayload::CreateMeal(meal).validate().is_ok());
    }

    #[test]
    fn booking_limits_guests_to_spots_left() {
        let mut draft = FormDraft::booking(jollof());
        draft.set("guests", "4");
        draft.set("first_name", "Ama");
        draft.set("last_name", "Serwaa");
        draft.set("email", "ama@example.com");
        draft.set("phone", "+233 20 000 0000");
        let errors = draft.advance().expect_err("too many guests");
        assert_eq!(errors.get("guests"), Some("Guests must be between 1 and 3"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn booking_composes_request_with_total() {
        let mut draft = FormDraft::booking(jollof());
        draft.set("guests", "2");
        draft.set("first_name", "Ama");
        draft.set("last_name", "Serwaa");
        draft.set("email", "ama@example.com");
        draft.set("phone", "+233 20 000 0000");
        assert_eq!(draft.advance(), Ok(DraftProgress::NextStep(1)));

        draft.set("card_number", "4111 1111 1111 1111");
        draft.set("card_expiry", "12/27");
        draft.set("card_cvv", "123");
        draft.set("card_name", "Ama Serwaa");
        let progress = draft.advance().expect("valid booking");
        let DraftProgress::Complete(FormOutput::Submit(FormPayload::Booking(request))) = progress
        else {
            panic!("expected a booking payload");
        };
        assert_eq!(request.guest_name, "Ama Serwaa");
        assert_eq!(request.guests, 2);
        assert_eq!(request.total_pesewas, 15_400);
        assert_eq!(request.meal_id, MealId::new(1));
    }

    #[test]
    fn complaint_requires_type_and_accepts_optional_date() {
        let mut draft = FormDraft::complaint();
        draft.set("name", "Ama Serwaa");
        draft.set("email", "ama@example.com");
        draft.set("subject", "Cold food");
        draft.set("description", "The meal was served cold.");
        let errors = draft.advance().expect_err("missing type");
        assert_eq!(
            errors.get("complaint_type"),
            Some("Choose a complaint type")
        );

        draft.set("complaint_type", "food-quality");
        draft.set("incident_date", "2025-01-15");
        let progress = draft.advance().expect("valid complaint");
        let DraftProgress::Complete(FormOutput::Submit(FormPayload::Complaint(complaint))) =
            progress
        else {
            panic!("expected a complaint payload");
        };
        assert_eq!(complaint.complaint_type, ComplaintType::FoodQuality);
        assert_eq!(complaint.incident_date, Some(date!(2025 - 01 - 15)));
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut draft = FormDraft::admin_login();
        for ch in "a@b.co".chars() {
            draft.push_char(ch);
        }
        draft.pop_char();
        assert_eq!(draft.value("email"), "a@b.c");
        draft.focus_next();
        assert_eq!(draft.focused_field().key, "password");
        assert!(draft.focused_field().secret);
        draft.focus_next();
        assert_eq!(draft.focused_field().key, "email");
    }
}
