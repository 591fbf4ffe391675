//! Ristorante Bellagio website
//!
//! Server-rendered public site (menu and table reservations) and admin back
//! office (reservation and menu management), both talking to the
//! reservation backend's REST API.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;
