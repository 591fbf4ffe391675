use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    auth::{AuthContext, TokenStore},
    gateway::Gateway,
    session::SessionRegistry,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn Gateway>,
    pub tokens: Arc<dyn TokenStore>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig, gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenStore>) -> Self {
        let sessions = SessionRegistry::from_config(&config);
        Self {
            config: Arc::new(config),
            gateway,
            tokens,
            sessions: Arc::new(sessions),
        }
    }

    /// Admin credentials of one browser session.
    pub fn auth(&self, session_id: &str) -> AuthContext {
        AuthContext::new(self.tokens.clone(), session_id)
    }
}
