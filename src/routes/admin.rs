//! Admin login and dashboard.
//!
//! Every mutation ends in a redirect back to the dashboard, which reloads
//! both lists; the outcome is carried to that render as a one-shot notice.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use garde::Validate;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::models::auth::{AuthToken, LoginForm};
use crate::models::dish::{DishFields, DishWritePayload, ImageBlob, IMAGE_PART};
use crate::models::reservation::{short_id, ReservationStatus, StatusPatch};
use crate::services::session::Notice;
use crate::views::admin::{
    render_admin_error, render_confirm_delete, render_dashboard, AdminTab, DashboardView,
    SESSION_EXPIRED,
};
use crate::views::login::render_login;
use crate::views::PageContext;

use super::session::BrowserSession;

pub const LOGIN_FAILED: &str = "Login failed. Check server status or credentials.";
pub const CREDENTIALS_REQUIRED: &str = "Email and password are required.";
pub const OPERATION_FAILED: &str = "Operation failed.";
pub const DELETION_FAILED: &str = "Deletion failed.";
pub const STATUS_UPDATE_FAILED: &str = "Failed to update status.";
pub const RESERVATION_DELETE_FAILED: &str = "Failed to delete reservation.";

const RESERVATIONS_TAB: &str = "/admin?view=reservations";
const MENU_TAB: &str = "/admin?view=menu";

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub view: Option<String>,
    pub edit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Body of the delete confirmation form.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: String,
}

impl ConfirmForm {
    fn confirmed(&self) -> bool {
        self.confirm == "yes"
    }
}

/// The session's admin token, or a redirect to the login page.
fn require_token(state: &AppState, session: &BrowserSession) -> Result<AuthToken, Response> {
    state
        .auth(&session.id)
        .token()
        .ok_or_else(|| (session.clone(), Redirect::to("/login")).into_response())
}

fn page_context(state: &AppState, session: &BrowserSession) -> PageContext {
    PageContext::new(state.auth(&session.id).state())
}

// ── Login ───────────────────────────────────────────────────────

/// GET /login
pub async fn login_page(State(state): State<AppState>, session: BrowserSession) -> Response {
    let ctx = page_context(&state, &session);
    if ctx.auth.is_logged_in() {
        return (session, Redirect::to("/admin")).into_response();
    }
    let page = render_login(&ctx, None, "");
    (session, Html(page)).into_response()
}

/// POST /login: exchange credentials for a token and keep it for this browser.
pub async fn login(
    State(state): State<AppState>,
    session: BrowserSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = state.auth(&session.id);

    if let Err(report) = form.validate() {
        tracing::debug!(%report, "Login form rejected");
        let page = render_login(&PageContext::new(auth.state()), Some(CREDENTIALS_REQUIRED), &form.email);
        return (session, Html(page)).into_response();
    }

    match state.gateway.login(&form.email, &form.password).await {
        Ok(token) => {
            auth.sign_in(&token);
            tracing::info!("Admin signed in");
            (session, Redirect::to("/admin")).into_response()
        }
        Err(err) => {
            tracing::warn!(category = %err.category, error = %err, "Login failed");
            let message = err.message_or(LOGIN_FAILED);
            let page = render_login(&PageContext::new(auth.state()), Some(&message), &form.email);
            (session, Html(page)).into_response()
        }
    }
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, session: BrowserSession) -> (BrowserSession, Redirect) {
    state.auth(&session.id).sign_out();
    (session, Redirect::to("/login"))
}

// ── Dashboard ───────────────────────────────────────────────────

/// GET /admin: both lists, reloaded on every visit.
pub async fn dashboard(
    State(state): State<AppState>,
    session: BrowserSession,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let token = match require_token(&state, &session) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    let ctx = page_context(&state, &session);

    let reservations = match state.gateway.list_reservations(&token).await {
        Ok(reservations) => reservations,
        Err(err) => {
            tracing::warn!(category = %err.category, error = %err, "Failed to load reservations");
            let message = if err.is_unauthorized() {
                SESSION_EXPIRED.to_string()
            } else {
                format!("Failed to load admin data: {}", err.message_or(OPERATION_FAILED))
            };
            let page = render_admin_error(&ctx, &message);
            return (session, Html(page)).into_response();
        }
    };

    let dishes = match state.gateway.list_dishes().await {
        Ok(dishes) => dishes,
        Err(err) => {
            tracing::error!(error = %err, "Error fetching dishes");
            Vec::new()
        }
    };

    let editing = query
        .edit
        .as_deref()
        .and_then(|id| dishes.iter().find(|dish| dish.id == id));
    let tab = if editing.is_some() {
        AdminTab::Menu
    } else {
        AdminTab::from_query(query.view.as_deref())
    };
    let notice = state.sessions.take_notice(&session.id);

    let view = DashboardView {
        tab,
        reservations: &reservations,
        dishes: &dishes,
        notice: notice.as_ref(),
        editing,
        timezone: state.config.restaurant_tz,
    };
    let page = render_dashboard(&ctx, &view);
    (session, Html(page)).into_response()
}

// ── Reservations ────────────────────────────────────────────────

/// POST /admin/reservations/{id}/status
pub async fn update_reservation_status(
    State(state): State<AppState>,
    session: BrowserSession,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let token = match require_token(&state, &session) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };

    let notice = match form.status.parse::<ReservationStatus>() {
        Ok(status) => {
            let patch = StatusPatch { status };
            match state.gateway.update_reservation(&id, &patch, &token).await {
                Ok(()) => Notice::success(format!(
                    "Reservation {} status updated to {status}.",
                    short_id(&id)
                )),
                Err(err) => {
                    tracing::warn!(reservation = %id, error = %err, "Status update failed");
                    Notice::error(err.message_or(STATUS_UPDATE_FAILED))
                }
            }
        }
        Err(_) => Notice::error(STATUS_UPDATE_FAILED),
    };

    state.sessions.set_notice(&session.id, notice);
    (session, Redirect::to(RESERVATIONS_TAB)).into_response()
}

/// GET /admin/reservations/{id}/delete
pub async fn confirm_reservation_delete(
    State(state): State<AppState>,
    session: BrowserSession,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = require_token(&state, &session) {
        return redirect;
    }
    let ctx = page_context(&state, &session);
    let prompt = format!("Are you sure you want to delete reservation {}?", short_id(&id));
    let action = format!("/admin/reservations/{id}/delete");
    let page = render_confirm_delete(&ctx, &prompt, &action, RESERVATIONS_TAB);
    (session, Html(page)).into_response()
}

/// POST /admin/reservations/{id}/delete: only acts on `confirm=yes`.
pub async fn delete_reservation(
    State(state): State<AppState>,
    session: BrowserSession,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let token = match require_token(&state, &session) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    if !form.confirmed() {
        return (session, Redirect::to(RESERVATIONS_TAB)).into_response();
    }

    let notice = match state.gateway.delete_reservation(&id, &token).await {
        Ok(()) => Notice::success(format!("Reservation {} successfully deleted.", short_id(&id))),
        Err(err) => {
            tracing::warn!(reservation = %id, error = %err, "Reservation delete failed");
            Notice::error(err.message_or(RESERVATION_DELETE_FAILED))
        }
    };

    state.sessions.set_notice(&session.id, notice);
    (session, Redirect::to(RESERVATIONS_TAB)).into_response()
}

// ── Dishes ──────────────────────────────────────────────────────

/// Read the multipart dish form. An empty file input means "no new image".
pub async fn read_dish_form(mut multipart: Multipart) -> Result<DishWritePayload, String> {
    let mut fields = DishFields { is_available: false, ..DishFields::default() };
    let mut price = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_PART {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.map_err(|e| e.body_text())?;
            if !bytes.is_empty() {
                image = Some(ImageBlob::sniff(file_name, bytes.to_vec()).map_err(|e| e.to_string())?);
            }
            continue;
        }

        let value = field.text().await.map_err(|e| e.body_text())?;
        match name.as_str() {
            "name" => fields.name = value.trim().to_string(),
            "description" => fields.description = value,
            "price" => price = Some(value),
            "category" => {
                fields.category = value
                    .parse()
                    .map_err(|_| format!("Unknown category: {value}."))?
            }
            "isAvailable" => fields.is_available = value != "false",
            "imageUrl" => fields.image_url = Some(value).filter(|v| !v.is_empty()),
            _ => {}
        }
    }

    fields.price = price
        .as_deref()
        .map(str::trim)
        .and_then(|p| p.parse::<f64>().ok())
        .ok_or_else(|| "Price must be a number.".to_string())?;

    fields
        .validate()
        .map_err(|report| format!("Invalid dish: {report}"))?;

    Ok(DishWritePayload { fields, image })
}

/// POST /admin/dishes
pub async fn create_dish(
    State(state): State<AppState>,
    session: BrowserSession,
    multipart: Multipart,
) -> Response {
    let token = match require_token(&state, &session) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };

    let notice = match read_dish_form(multipart).await {
        Ok(payload) => match state.gateway.create_dish(&payload, &token).await {
            Ok(dish) => {
                tracing::info!(dish = %dish.id, "Dish created");
                Notice::success("New dish successfully created!")
            }
            Err(err) => {
                tracing::warn!(error = %err, "Dish create failed");
                Notice::error(err.message_or(OPERATION_FAILED))
            }
        },
        Err(message) => Notice::error(message),
    };

    state.sessions.set_notice(&session.id, notice);
    (session, Redirect::to(MENU_TAB)).into_response()
}

/// POST /admin/dishes/{id}: on failure the form stays in edit mode.
pub async fn update_dish(
    State(state): State<AppState>,
    session: BrowserSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let token = match require_token(&state, &session) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };

    let result = match read_dish_form(multipart).await {
        Ok(payload) => state
            .gateway
            .update_dish(&id, &payload, &token)
            .await
            .map_err(|err| {
                tracing::warn!(dish = %id, error = %err, "Dish update failed");
                err.message_or(OPERATION_FAILED)
            }),
        Err(message) => Err(message),
    };

    let target = match result {
        Ok(_) => {
            state
                .sessions
                .set_notice(&session.id, Notice::success("Dish successfully updated!"));
            MENU_TAB.to_string()
        }
        Err(message) => {
            state.sessions.set_notice(&session.id, Notice::error(message));
            format!("/admin?view=menu&edit={id}#dish-form")
        }
    };
    (session, Redirect::to(&target)).into_response()
}

/// GET /admin/dishes/{id}/delete
pub async fn confirm_dish_delete(
    State(state): State<AppState>,
    session: BrowserSession,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = require_token(&state, &session) {
        return redirect;
    }
    let ctx = page_context(&state, &session);
    let action = format!("/admin/dishes/{id}/delete");
    let page = render_confirm_delete(&ctx, "Are you sure you want to delete this dish?", &action, MENU_TAB);
    (session, Html(page)).into_response()
}

/// POST /admin/dishes/{id}/delete: only acts on `confirm=yes`.
pub async fn delete_dish(
    State(state): State<AppState>,
    session: BrowserSession,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let token = match require_token(&state, &session) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    if !form.confirmed() {
        return (session, Redirect::to(MENU_TAB)).into_response();
    }

    let notice = match state.gateway.delete_dish(&id, &token).await {
        Ok(()) => Notice::success("Dish successfully deleted."),
        Err(err) => {
            tracing::warn!(dish = %id, error = %err, "Dish delete failed");
            Notice::error(err.message_or(DELETION_FAILED))
        }
    };

    state.sessions.set_notice(&session.id, notice);
    (session, Redirect::to(MENU_TAB)).into_response()
}
