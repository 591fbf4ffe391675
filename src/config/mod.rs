use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the reservation backend REST API.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Prefix for dish image paths. Falls back to `backend_url`.
    #[serde(default)]
    pub image_base_url: Option<String>,

    /// Transport timeout for backend requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long a success or failure banner stays before the form returns to idle.
    #[serde(default = "default_status_display_secs")]
    pub status_display_secs: u64,

    /// Upper bound for admin dish uploads (multipart body size).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// IANA zone the booking form's wall-clock times are read in (e.g., "Europe/Rome").
    #[serde(default = "default_restaurant_tz")]
    pub restaurant_tz: Tz,

    /// Browser sessions and admin tokens unused for this long are dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// How often idle sessions are swept.
    #[serde(default = "default_session_sweep_secs")]
    pub session_sweep_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_backend_url() -> String {
    "https://bellagio-backend.onrender.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_status_display_secs() -> u64 {
    3
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_restaurant_tz() -> Tz {
    chrono_tz::Europe::Rome
}

fn default_session_idle_secs() -> u64 {
    2 * 60 * 60
}

fn default_session_sweep_secs() -> u64 {
    300
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Configuration pointing at a given backend, everything else defaulted.
    pub fn for_backend(backend_url: impl Into<String>) -> Self {
        Self {
            bind_addr: default_bind_addr(),
            backend_url: backend_url.into(),
            image_base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            status_display_secs: default_status_display_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            restaurant_tz: default_restaurant_tz(),
            session_idle_secs: default_session_idle_secs(),
            session_sweep_secs: default_session_sweep_secs(),
        }
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url
            .as_deref()
            .unwrap_or(&self.backend_url)
            .trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn status_display(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.status_display_secs as i64)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn session_sweep(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs)
    }
}
