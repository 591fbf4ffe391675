use garde::Validate;
use serde::{Deserialize, Serialize};

/// Credentials posted by the admin login form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct LoginForm {
    #[garde(length(min = 1, max = 254))]
    #[serde(default)]
    pub email: String,

    #[garde(length(min = 1))]
    #[serde(default)]
    pub password: String,
}

/// Opaque bearer token issued by the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Whether the current browser holds an admin token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn(AuthToken),
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn(_))
    }

    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            AuthState::LoggedIn(token) => Some(token),
            AuthState::LoggedOut => None,
        }
    }
}
