//! Test helpers: an in-memory backend and request builders for the router.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;
use uuid::Uuid;

use bellagio_web::app_state::AppState;
use bellagio_web::config::AppConfig;
use bellagio_web::models::auth::AuthToken;
use bellagio_web::models::dish::{Dish, DishFields, DishWritePayload};
use bellagio_web::models::reservation::{
    Reservation, ReservationAck, ReservationPayload, ReservationStatus, StatusPatch,
};
use bellagio_web::routes::{self, session::SESSION_COOKIE};
use bellagio_web::services::auth::MemoryTokenStore;
use bellagio_web::services::gateway::{ErrorCategory, Gateway, RemoteError};

pub const ADMIN_TOKEN: &str = "admin-token-123";

/// A backend call as seen by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListDishes,
    CreateReservation(ReservationPayload),
    ListReservations { token: String },
    UpdateReservation { id: String, status: ReservationStatus, token: String },
    DeleteReservation { id: String, token: String },
    CreateDish { fields: DishFields, has_image: bool, token: String },
    UpdateDish { id: String, fields: DishFields, has_image: bool, token: String },
    DeleteDish { id: String, token: String },
    Login { email: String },
}

/// Scripted backend that records every call.
pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    dishes: Result<Vec<Dish>, RemoteError>,
    reservations: Result<Vec<Reservation>, RemoteError>,
    reservation_ack: Result<ReservationAck, RemoteError>,
    mutation_error: Option<RemoteError>,
    login: Result<AuthToken, RemoteError>,
    /// When set, `create_reservation` waits for a notification before answering.
    reservation_gate: Option<Arc<Notify>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            dishes: Ok(Vec::new()),
            reservations: Ok(Vec::new()),
            reservation_ack: Ok(ReservationAck { success: true }),
            mutation_error: None,
            login: Ok(AuthToken::new(ADMIN_TOKEN)),
            reservation_gate: None,
        }
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dishes(mut self, dishes: Vec<Dish>) -> Self {
        self.dishes = Ok(dishes);
        self
    }

    pub fn failing_dishes(mut self, err: RemoteError) -> Self {
        self.dishes = Err(err);
        self
    }

    pub fn with_reservations(mut self, reservations: Vec<Reservation>) -> Self {
        self.reservations = Ok(reservations);
        self
    }

    pub fn failing_reservations(mut self, err: RemoteError) -> Self {
        self.reservations = Err(err);
        self
    }

    pub fn reservation_answer(mut self, answer: Result<ReservationAck, RemoteError>) -> Self {
        self.reservation_ack = answer;
        self
    }

    pub fn failing_mutations(mut self, err: RemoteError) -> Self {
        self.mutation_error = Some(err);
        self
    }

    pub fn login_answer(mut self, answer: Result<AuthToken, RemoteError>) -> Self {
        self.login = answer;
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.reservation_gate = Some(gate);
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn reservation_submissions(&self) -> Vec<ReservationPayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateReservation(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Calls other than the public menu fetch.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::ListDishes | Call::ListReservations { .. }))
            .collect()
    }

    fn mutation_result(&self) -> Result<(), RemoteError> {
        match &self.mutation_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn echo_dish(id: &str, payload: &DishWritePayload) -> Dish {
        Dish {
            id: id.to_string(),
            name: payload.fields.name.clone(),
            description: payload.fields.description.clone(),
            price: payload.fields.price,
            is_available: payload.fields.is_available,
            category: payload.fields.category.to_string(),
            image_url: payload.fields.image_url.clone(),
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_dishes(&self) -> Result<Vec<Dish>, RemoteError> {
        self.record(Call::ListDishes);
        self.dishes.clone()
    }

    async fn create_reservation(
        &self,
        payload: &ReservationPayload,
    ) -> Result<ReservationAck, RemoteError> {
        self.record(Call::CreateReservation(payload.clone()));
        if let Some(gate) = &self.reservation_gate {
            gate.notified().await;
        }
        self.reservation_ack.clone()
    }

    async fn list_reservations(&self, token: &AuthToken) -> Result<Vec<Reservation>, RemoteError> {
        self.record(Call::ListReservations { token: token.as_str().to_string() });
        self.reservations.clone()
    }

    async fn update_reservation(
        &self,
        id: &str,
        patch: &StatusPatch,
        token: &AuthToken,
    ) -> Result<(), RemoteError> {
        self.record(Call::UpdateReservation {
            id: id.to_string(),
            status: patch.status,
            token: token.as_str().to_string(),
        });
        self.mutation_result()
    }

    async fn delete_reservation(&self, id: &str, token: &AuthToken) -> Result<(), RemoteError> {
        self.record(Call::DeleteReservation {
            id: id.to_string(),
            token: token.as_str().to_string(),
        });
        self.mutation_result()
    }

    async fn create_dish(
        &self,
        payload: &DishWritePayload,
        token: &AuthToken,
    ) -> Result<Dish, RemoteError> {
        self.record(Call::CreateDish {
            fields: payload.fields.clone(),
            has_image: payload.image.is_some(),
            token: token.as_str().to_string(),
        });
        self.mutation_result()?;
        Ok(Self::echo_dish("new-dish", payload))
    }

    async fn update_dish(
        &self,
        id: &str,
        payload: &DishWritePayload,
        token: &AuthToken,
    ) -> Result<Dish, RemoteError> {
        self.record(Call::UpdateDish {
            id: id.to_string(),
            fields: payload.fields.clone(),
            has_image: payload.image.is_some(),
            token: token.as_str().to_string(),
        });
        self.mutation_result()?;
        Ok(Self::echo_dish(id, payload))
    }

    async fn delete_dish(&self, id: &str, token: &AuthToken) -> Result<(), RemoteError> {
        self.record(Call::DeleteDish {
            id: id.to_string(),
            token: token.as_str().to_string(),
        });
        self.mutation_result()
    }

    async fn login(&self, email: &str, _password: &str) -> Result<AuthToken, RemoteError> {
        self.record(Call::Login { email: email.to_string() });
        self.login.clone()
    }
}

pub fn server_error(message: &str) -> RemoteError {
    RemoteError::new(ErrorCategory::ServerError, Some(message.to_string()))
}

pub fn unauthorized() -> RemoteError {
    RemoteError::new(ErrorCategory::Unauthorized, Some("Token expired".to_string()))
}

// ── Router harness ──────────────────────────────────────────────

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub gateway: Arc<FakeGateway>,
}

impl TestApp {
    pub fn new(gateway: FakeGateway) -> Self {
        let gateway = Arc::new(gateway);
        let config = AppConfig::for_backend("http://backend.test");
        let tokens = Arc::new(MemoryTokenStore::new(config.session_idle()));
        let state = AppState::new(config, gateway.clone(), tokens);
        Self {
            router: routes::router(state.clone()),
            state,
            gateway,
        }
    }

    /// A browser session that is already signed in.
    pub fn admin_session(&self) -> String {
        let sid = new_session_id();
        self.state.auth(&sid).sign_in(&AuthToken::new(ADMIN_TOKEN));
        sid
    }
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn get(uri: &str, sid: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(sid) = sid {
        builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={sid}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, sid: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(sid) = sid {
        builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={sid}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_multipart(uri: &str, sid: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", crate::fixtures::MULTIPART_BOUNDARY),
        )
        .header(COOKIE, format!("{SESSION_COOKIE}={sid}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Session id handed out in a `Set-Cookie` header, if any.
pub fn issued_session(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| cookie.strip_prefix(&format!("{SESSION_COOKIE}=")).map(str::to_string))
        .and_then(|rest| rest.split(';').next().map(str::to_string))
}
