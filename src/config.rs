//! Client configuration (layered: code > env > default).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::store::{FileTokenStore, TokenStore};
use crate::session::{SignOutHook, LOGOUT_SIGN_OUT_DELAY};

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SIGTRACE_BASE_URL";

/// Default backend location for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Configuration for an [`ApiClient`](crate::http::ApiClient).
///
/// The token store and sign-out hook are injected here so embeddings (and
/// tests) can substitute their own; by default the session persists to
/// `~/.sigtrace` and sign-out does nothing.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_store: Arc<dyn TokenStore>,
    pub sign_out: SignOutHook,
    pub sign_out_delay: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token_store", &"..")
            .field("sign_out", &"..")
            .field("sign_out_delay", &self.sign_out_delay)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Default configuration: local backend, file-backed session store.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_store: Arc::new(FileTokenStore::new_default()),
            sign_out: Arc::new(|| {}),
            sign_out_delay: LOGOUT_SIGN_OUT_DELAY,
        }
    }

    /// Load configuration from the environment (`SIGTRACE_BASE_URL`),
    /// reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::new();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = store;
        self
    }

    /// Install the callback run once a logout sequence completes.
    pub fn with_sign_out(mut self, hook: SignOutHook) -> Self {
        self.sign_out = hook;
        self
    }

    /// Override the notification-to-sign-out delay (tests use a short one).
    pub fn with_sign_out_delay(mut self, delay: Duration) -> Self {
        self.sign_out_delay = delay;
        self
    }
}
