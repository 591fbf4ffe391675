//! Reservation draft validation.
//!
//! Every rule runs on every call, so the resulting map can hold several
//! messages at once. Validation never fails: problems are returned as data,
//! keyed by the form field they belong to.

use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::reservation::{Field, ReservationDraft};

pub const NAME_REQUIRED: &str = "Full Name is required.";
pub const EMAIL_INVALID: &str = "Valid email address is required.";
pub const GUESTS_OUT_OF_RANGE: &str = "Number of guests must be between 1 and 20.";
pub const DATE_IN_PAST: &str = "Reservation date and time cannot be in the past.";

pub const MIN_GUESTS: i64 = 1;
pub const MAX_GUESTS: i64 = 20;

/// `local@domain.tld` with word segments joined by `.` or `-` and a 2–3 character suffix.
/// ASCII word characters only; `+` and longer suffixes are rejected.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
        .expect("email pattern is a valid regex")
});

/// Per-field validation messages. A field without an entry passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap(BTreeMap<Field, String>);

impl FieldErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Drop one field's message, leaving the others untouched.
    pub fn clear_field(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate a draft against the reservation rules as of `now` (local wall clock).
pub fn validate(draft: &ReservationDraft, now: NaiveDateTime) -> FieldErrorMap {
    let mut errors = FieldErrorMap::new();

    if draft.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if draft.email.is_empty() || !is_valid_email(&draft.email) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }

    match draft.guests {
        Some(guests) if (MIN_GUESTS..=MAX_GUESTS).contains(&guests) => {}
        _ => errors.insert(Field::Guests, GUESTS_OUT_OF_RANGE),
    }

    match draft.date_time {
        Some(date_time) if date_time >= now => {}
        _ => errors.insert(Field::DateTime, DATE_IN_PAST),
    }

    errors
}
