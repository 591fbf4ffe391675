pub mod admin;
pub mod health;
pub mod metrics;
pub mod public;
pub mod session;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// All pages and form endpoints of the site.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(public::home))
        .route("/reservations", post(public::submit_reservation))
        .route("/login", get(admin::login_page).post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/reservations/{id}/status",
            post(admin::update_reservation_status),
        )
        .route(
            "/admin/reservations/{id}/delete",
            get(admin::confirm_reservation_delete).post(admin::delete_reservation),
        )
        .route("/admin/dishes", post(admin::create_dish))
        .route("/admin/dishes/{id}", post(admin::update_dish))
        .route(
            "/admin/dishes/{id}/delete",
            get(admin::confirm_dish_delete).post(admin::delete_dish),
        )
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
