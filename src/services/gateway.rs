//! Client for the Bellagio backend REST API.
//!
//! One method per backend capability. Failures are reported once as a
//! [`RemoteError`]; nothing here retries. Authenticated calls take the
//! token from the caller and never touch token storage.

use async_trait::async_trait;
use reqwest::header::SET_COOKIE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use strum::Display;

use crate::models::auth::AuthToken;
use crate::models::dish::{Dish, DishWritePayload};
use crate::models::reservation::{Reservation, ReservationAck, ReservationPayload, StatusPatch};
use crate::models::{DataEnvelope, MaybeEnveloped};

/// What kind of failure a backend call ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorCategory {
    Unauthorized,
    Validation,
    NotFound,
    ServerError,
    NetworkError,
}

impl ErrorCategory {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => ErrorCategory::Unauthorized,
            400 | 409 | 422 => ErrorCategory::Validation,
            404 => ErrorCategory::NotFound,
            _ => ErrorCategory::ServerError,
        }
    }
}

/// A failed backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{category}: {}", .message.as_deref().unwrap_or("no details from backend"))]
pub struct RemoteError {
    pub category: ErrorCategory,
    /// Human-readable text supplied by the backend, if any.
    pub message: Option<String>,
    pub status: Option<u16>,
}

impl RemoteError {
    pub fn new(category: ErrorCategory, message: Option<String>) -> Self {
        Self { category, message, status: None }
    }

    /// Classify a non-2xx response, lifting `{"error": ...}` or `{"message": ...}` from the body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self {
            category: ErrorCategory::from_status(status),
            message: backend_message(body),
            status: Some(status.as_u16()),
        }
    }

    pub fn from_transport(err: reqwest::Error) -> Self {
        let category = if err.is_decode() {
            ErrorCategory::ServerError
        } else {
            ErrorCategory::NetworkError
        };
        Self {
            category,
            message: None,
            status: err.status().map(|s| s.as_u16()),
        }
    }

    /// A request that could not be built, such as an upload with an unusable content type.
    /// Nothing was sent.
    pub fn unsendable(err: reqwest::Error) -> Self {
        Self::new(ErrorCategory::Validation, Some(format!("Invalid upload: {err}")))
    }

    fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ErrorCategory::ServerError, Some(detail.into()))
    }

    /// The backend's message, or `fallback` when it sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.category == ErrorCategory::Unauthorized
    }
}

fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// The backend operations the site needs.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_dishes(&self) -> Result<Vec<Dish>, RemoteError>;

    async fn create_reservation(
        &self,
        payload: &ReservationPayload,
    ) -> Result<ReservationAck, RemoteError>;

    async fn list_reservations(&self, token: &AuthToken) -> Result<Vec<Reservation>, RemoteError>;

    async fn update_reservation(
        &self,
        id: &str,
        patch: &StatusPatch,
        token: &AuthToken,
    ) -> Result<(), RemoteError>;

    async fn delete_reservation(&self, id: &str, token: &AuthToken) -> Result<(), RemoteError>;

    async fn create_dish(
        &self,
        payload: &DishWritePayload,
        token: &AuthToken,
    ) -> Result<Dish, RemoteError>;

    async fn update_dish(
        &self,
        id: &str,
        payload: &DishWritePayload,
        token: &AuthToken,
    ) -> Result<Dish, RemoteError>;

    async fn delete_dish(&self, id: &str, token: &AuthToken) -> Result<(), RemoteError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, RemoteError>;
}

/// [`Gateway`] over HTTP with `reqwest`.
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("bellagio-web/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, record metrics, and turn non-2xx answers into errors.
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, RemoteError> {
        let start = Instant::now();
        let result = match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Err(RemoteError::from_response(status, &body))
            }
            Err(err) => {
                tracing::debug!(operation, error = %err, "Backend transport failure");
                Err(RemoteError::from_transport(err))
            }
        };

        metrics::histogram!("backend_request_seconds", "operation" => operation)
            .record(start.elapsed().as_secs_f64());
        let outcome = match &result {
            Ok(_) => "ok",
            Err(_) => "error",
        };
        metrics::counter!("backend_requests_total", "operation" => operation, "outcome" => outcome)
            .increment(1);

        match &result {
            Ok(response) => tracing::debug!(operation, status = %response.status(), "Backend call succeeded"),
            Err(err) => tracing::warn!(operation, category = %err.category, error = %err, "Backend call failed"),
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = self.send(operation, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::malformed(format!("Unexpected response from backend: {e}")))
    }

    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> Result<(), RemoteError> {
        self.send(operation, request).await.map(|_| ())
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_dishes(&self) -> Result<Vec<Dish>, RemoteError> {
        let request = self.http.get(self.url("/api/dishes"));
        let envelope: DataEnvelope<Vec<Dish>> = self.fetch("list_dishes", request).await?;
        Ok(envelope.data)
    }

    async fn create_reservation(
        &self,
        payload: &ReservationPayload,
    ) -> Result<ReservationAck, RemoteError> {
        let request = self.http.post(self.url("/api/reservations")).json(payload);
        self.fetch("create_reservation", request).await
    }

    async fn list_reservations(&self, token: &AuthToken) -> Result<Vec<Reservation>, RemoteError> {
        let request = self
            .http
            .get(self.url("/api/reservations"))
            .bearer_auth(token.as_str());
        let envelope: DataEnvelope<Vec<Reservation>> =
            self.fetch("list_reservations", request).await?;
        Ok(envelope.data)
    }

    async fn update_reservation(
        &self,
        id: &str,
        patch: &StatusPatch,
        token: &AuthToken,
    ) -> Result<(), RemoteError> {
        let request = self
            .http
            .put(self.url(&format!("/api/reservations/{id}")))
            .bearer_auth(token.as_str())
            .json(patch);
        self.execute("update_reservation", request).await
    }

    async fn delete_reservation(&self, id: &str, token: &AuthToken) -> Result<(), RemoteError> {
        let request = self
            .http
            .delete(self.url(&format!("/api/reservations/{id}")))
            .bearer_auth(token.as_str());
        self.execute("delete_reservation", request).await
    }

    async fn create_dish(
        &self,
        payload: &DishWritePayload,
        token: &AuthToken,
    ) -> Result<Dish, RemoteError> {
        let form = payload.to_multipart().map_err(RemoteError::unsendable)?;
        let request = self
            .http
            .post(self.url("/api/dishes"))
            .bearer_auth(token.as_str())
            .multipart(form);
        let dish: MaybeEnveloped<Dish> = self.fetch("create_dish", request).await?;
        Ok(dish.into_inner())
    }

    async fn update_dish(
        &self,
        id: &str,
        payload: &DishWritePayload,
        token: &AuthToken,
    ) -> Result<Dish, RemoteError> {
        let form = payload.to_multipart().map_err(RemoteError::unsendable)?;
        let request = self
            .http
            .put(self.url(&format!("/api/dishes/{id}")))
            .bearer_auth(token.as_str())
            .multipart(form);
        let dish: MaybeEnveloped<Dish> = self.fetch("update_dish", request).await?;
        Ok(dish.into_inner())
    }

    async fn delete_dish(&self, id: &str, token: &AuthToken) -> Result<(), RemoteError> {
        let request = self
            .http
            .delete(self.url(&format!("/api/dishes/{id}")))
            .bearer_auth(token.as_str());
        self.execute("delete_dish", request).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthToken, RemoteError> {
        let request = self
            .http
            .post(self.url("/api/v1/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = self.send("login", request).await?;

        let cookie_token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(token_from_set_cookie);
        let body = response.text().await.unwrap_or_default();

        token_from_body(&body)
            .or(cookie_token)
            .map(AuthToken::new)
            .ok_or_else(|| RemoteError::malformed("Login response did not include a token."))
    }
}

/// `{"token": ...}` or `{"data": {"token": ...}}`.
fn token_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("token")
        .or_else(|| value.get("data").and_then(|d| d.get("token")))
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Value of a `token=...` cookie.
fn token_from_set_cookie(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name.trim() == "token" && !value.is_empty()).then(|| value.trim().to_string())
}
