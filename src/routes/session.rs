use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};
use std::convert::Infallible;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "bellagio_sid";

/// Browser identity carried in the `bellagio_sid` cookie.
///
/// A request without a valid cookie gets a new id; returning the session as
/// part of the response sets the cookie in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSession {
    pub id: String,
    pub is_new: bool,
}

impl BrowserSession {
    fn fresh() -> Self {
        Self { id: Uuid::new_v4().to_string(), is_new: true }
    }

    pub fn set_cookie_value(&self) -> String {
        format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id)
    }
}

/// Pull the session id out of `Cookie` headers; only well-formed uuids count.
pub fn session_id_from_cookies<'a>(headers: impl Iterator<Item = &'a HeaderValue>) -> Option<String> {
    headers
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
        .map(|id| id.to_string())
}

impl<S: Send + Sync> FromRequestParts<S> for BrowserSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match session_id_from_cookies(parts.headers.get_all(COOKIE).iter()) {
            Some(id) => Self { id, is_new: false },
            None => Self::fresh(),
        })
    }
}

impl IntoResponseParts for BrowserSession {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&self.set_cookie_value()) {
                res.headers_mut().append(SET_COOKIE, value);
            }
        }
        Ok(res)
    }
}
