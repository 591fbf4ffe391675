use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::models::auth::{AuthState, AuthToken};

/// Key the admin token is stored under.
pub const ADMIN_TOKEN_KEY: &str = "adminToken";

/// String key-value storage for client-held credentials.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

#[derive(Debug)]
struct StoredToken {
    value: String,
    last_used: Instant,
}

/// Process-wide in-memory [`TokenStore`].
///
/// Entries not read or written for the idle limit are dropped by
/// [`MemoryTokenStore::prune_idle`].
#[derive(Debug)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, StoredToken>>,
    idle_limit: Duration,
}

impl MemoryTokenStore {
    pub fn new(idle_limit: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            idle_limit,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredToken>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop entries unused for longer than the idle limit as of `now`.
    pub fn prune_idle(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_used) < self.idle_limit);
        before - entries.len()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        let entry = entries.get_mut(key)?;
        entry.last_used = Instant::now();
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, value: String) {
        let entry = StoredToken { value, last_used: Instant::now() };
        self.lock().insert(key.to_string(), entry);
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

/// Admin credentials of one browser session.
///
/// Nothing is cached: every call goes back to the store, so a login or
/// logout is visible to the very next request.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl AuthContext {
    pub fn new(store: Arc<dyn TokenStore>, session_id: &str) -> Self {
        Self {
            store,
            key: format!("{session_id}:{ADMIN_TOKEN_KEY}"),
        }
    }

    pub fn state(&self) -> AuthState {
        match self.token() {
            Some(token) => AuthState::LoggedIn(token),
            None => AuthState::LoggedOut,
        }
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.store
            .get(&self.key)
            .filter(|t| !t.is_empty())
            .map(AuthToken::new)
    }

    pub fn sign_in(&self, token: &AuthToken) -> AuthState {
        self.store.set(&self.key, token.as_str().to_string());
        self.state()
    }

    pub fn sign_out(&self) -> AuthState {
        self.store.remove(&self.key);
        self.state()
    }
}
