//! Shared test data: drafts, backend JSON and multipart bodies.
#![allow(dead_code)]

use bellagio_web::models::dish::Dish;
use bellagio_web::models::reservation::{Reservation, ReservationDraft, ReservationStatus};
use chrono::{NaiveDate, NaiveDateTime};

/// Fixed "now" for workflow tests: 2026-10-19 12:00 local.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

pub fn tomorrow_evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 20)
        .and_then(|d| d.and_hms_opt(20, 0, 0))
        .unwrap()
}

/// A draft that passes every rule.
pub fn valid_draft() -> ReservationDraft {
    ReservationDraft {
        name: "Giulia Rossi".to_string(),
        email: "giulia@example.com".to_string(),
        phone: "+39 333 1234567".to_string(),
        date_time: Some(tomorrow_evening()),
        guests: Some(2),
        message: "Window table, please".to_string(),
    }
}

/// Url-encoded reservation form for a date far in the future.
pub const VALID_RESERVATION_FORM: &str = "name=Giulia+Rossi&email=giulia%40example.com&phone=333&dateTime=2099-06-01T20%3A00&guests=4&message=";

pub const BLANK_NAME_FORM: &str =
    "name=&email=giulia%40example.com&phone=&dateTime=2099-06-01T20%3A00&guests=2&message=";

pub fn dish(id: &str, name: &str, price: f64) -> Dish {
    Dish {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} della casa"),
        price,
        is_available: true,
        category: "Main Course".to_string(),
        image_url: Some(format!("/uploads/{id}.jpg")),
    }
}

pub fn menu() -> Vec<Dish> {
    vec![
        dish("665f1c2a9d0e8b0012ab0001", "Lasagna", 16.0),
        dish("665f1c2a9d0e8b0012ab0002", "Tiramisu", 7.5),
    ]
}

pub fn reservation(id: &str, status: ReservationStatus) -> Reservation {
    Reservation {
        id: id.to_string(),
        date: "2026-10-20T18:00:00.000Z".to_string(),
        time: None,
        name: "Marco Bianchi".to_string(),
        email: "marco@example.com".to_string(),
        number_of_guests: 3,
        status,
    }
}

/// `GET /api/dishes` as the backend sends it.
pub const DISHES_JSON: &str = r#"{"data":[
  {"_id":"665f1c2a9d0e8b0012ab0001","name":"Lasagna","description":"Ragù, béchamel","price":16,"isAvailable":true,"category":"Main Course","imageUrl":"/uploads/lasagna.jpg"},
  {"_id":"665f1c2a9d0e8b0012ab0002","name":"Tiramisu","price":7.5,"isAvailable":false,"category":"Dessert"}
]}"#;

/// `GET /api/reservations`, mixing `name` and `guestName` records.
pub const RESERVATIONS_JSON: &str = r#"{"data":[
  {"_id":"7a1b2c3d4e5f60718293a4b5","date":"2026-10-20","time":"20:00","name":"Marco Bianchi","email":"marco@example.com","numberOfGuests":3,"status":"Pending"},
  {"_id":"7a1b2c3d4e5f60718293c0de","date":"2026-10-21T19:30:00.000Z","guestName":"Anna Verdi","email":"anna@example.com","numberOfGuests":2,"status":"Confirmed"}
]}"#;

pub const MULTIPART_BOUNDARY: &str = "bellagio-test-boundary";

pub const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// WebP magic; plain ASCII, so it can be matched inside a request body.
pub const WEBP_HEADER: &[u8] = b"RIFF$\0\0\0WEBPVP8 ";

/// Multipart body of the admin dish form. `image` is `(file name, bytes)`.
pub fn dish_form_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"dishImage\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
