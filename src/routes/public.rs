use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;

use crate::app_state::AppState;
use crate::models::reservation::ReservationForm;
use crate::services::reservation_flow::restaurant_now;
use crate::views::home::{render_home, HomeView, MenuState};
use crate::views::PageContext;

use super::session::BrowserSession;

/// GET /: hero, menu, reservation form and about section.
pub async fn home(
    State(state): State<AppState>,
    session: BrowserSession,
) -> (BrowserSession, Html<String>) {
    let menu = match state.gateway.list_dishes().await {
        Ok(dishes) => MenuState::Loaded(dishes),
        Err(err) => {
            tracing::error!(error = %err, "Error fetching dishes");
            MenuState::Unavailable
        }
    };

    let reservation = state.sessions.reservation(&session.id);
    let ctx = PageContext::new(state.auth(&session.id).state());
    let view = HomeView {
        menu: &menu,
        reservation: &reservation,
        image_base_url: state.config.image_base_url(),
        today: restaurant_now(state.config.restaurant_tz).date(),
        banner_secs: state.config.status_display_secs,
    };

    let page = render_home(&ctx, &view);
    (session, Html(page))
}

/// POST /reservations: validate and submit, then show the result on the home page.
pub async fn submit_reservation(
    State(state): State<AppState>,
    session: BrowserSession,
    Form(form): Form<ReservationForm>,
) -> (BrowserSession, Redirect) {
    state
        .sessions
        .submit_reservation(&session.id, &form, state.gateway.clone())
        .await;
    (session, Redirect::to("/#reservation"))
}
