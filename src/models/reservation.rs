use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Guests pre-filled on a fresh draft.
pub const DEFAULT_GUESTS: i64 = 2;

/// Hour of day (local) pre-filled on a fresh draft.
pub const DEFAULT_HOUR: u32 = 20;

/// Format of the `datetime-local` input the form renders.
pub const DATE_TIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Fields of the reservation form, named as the browser posts them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Phone,
    DateTime,
    Guests,
    Message,
}

/// The in-progress reservation a visitor is editing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Wall-clock date and time at the restaurant. `None` when the input could not be read.
    pub date_time: Option<NaiveDateTime>,
    /// `None` when the input was not a number.
    pub guests: Option<i64>,
    pub message: String,
}

impl ReservationDraft {
    /// Empty draft for `today`: two guests at 20:00.
    pub fn fresh(today: NaiveDate) -> Self {
        let evening = NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            date_time: Some(today.and_time(evening)),
            guests: Some(DEFAULT_GUESTS),
            message: String::new(),
        }
    }

    /// Replace one field from its raw input text.
    pub fn set(&mut self, field: Field, raw: &str) {
        match field {
            Field::Name => self.name = raw.to_string(),
            Field::Email => self.email = raw.to_string(),
            Field::Phone => self.phone = raw.to_string(),
            Field::DateTime => self.date_time = parse_date_time(raw),
            Field::Guests => self.guests = parse_guests(raw),
            Field::Message => self.message = raw.to_string(),
        }
    }

    /// The field's value as the form input shows it.
    pub fn input_value(&self, field: Field) -> String {
        match field {
            Field::Name => self.name.clone(),
            Field::Email => self.email.clone(),
            Field::Phone => self.phone.clone(),
            Field::DateTime => self
                .date_time
                .map(|dt| dt.format(DATE_TIME_INPUT_FORMAT).to_string())
                .unwrap_or_default(),
            Field::Guests => self.guests.map(|g| g.to_string()).unwrap_or_default(),
            Field::Message => self.message.clone(),
        }
    }
}

/// Accepts the `datetime-local` shape and the space-separated one, with or without seconds.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn parse_guests(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Reservation form as posted by the browser (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_time: String,
    pub guests: String,
    pub message: String,
}

impl ReservationForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::DateTime => &self.date_time,
            Field::Guests => &self.guests,
            Field::Message => &self.message,
        }
    }
}

/// Body of `POST /api/reservations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPayload {
    pub guest_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub number_of_guests: u32,
    #[serde(serialize_with = "serialize_instant")]
    pub date: DateTime<Utc>,
}

fn serialize_instant<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl ReservationPayload {
    /// Wire form of a draft whose wall-clock time is read in `tz`.
    /// `None` when the draft lacks a date or a usable guest count.
    pub fn from_draft(draft: &ReservationDraft, tz: Tz) -> Option<Self> {
        let local = draft.date_time?;
        let number_of_guests = u32::try_from(draft.guests?).ok()?;
        Some(Self {
            guest_name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            message: draft.message.clone(),
            number_of_guests,
            date: local_to_utc(local, tz),
        })
    }
}

fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Skipped by a DST jump; the nominal value is the best we have.
        None => local.and_utc(),
    }
}

/// Acknowledgement returned by `POST /api/reservations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationAck {
    #[serde(default)]
    pub success: bool,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Body of `PUT /api/reservations/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: ReservationStatus,
}

/// Reservation as listed for the admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, alias = "guestName")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "numberOfGuests", default)]
    pub number_of_guests: u32,
    #[serde(default)]
    pub status: ReservationStatus,
}

impl Reservation {
    /// Last four characters of the id, used in admin messages.
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }

    /// Date line of the admin table. ISO timestamps are shown in the restaurant's zone.
    pub fn display_date(&self, tz: Tz) -> String {
        match DateTime::parse_from_rfc3339(&self.date) {
            Ok(dt) => dt.with_timezone(&tz).format("%B %-d, %Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// Time line of the admin table: the explicit `time`, else derived from an ISO `date`.
    pub fn display_time(&self, tz: Tz) -> String {
        if let Some(time) = self.time.as_deref().filter(|t| !t.is_empty()) {
            return time.to_string();
        }
        DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.with_timezone(&tz).format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

pub fn short_id(id: &str) -> String {
    let count = id.chars().count();
    id.chars().skip(count.saturating_sub(4)).collect()
}
