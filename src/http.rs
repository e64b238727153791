//! Typed HTTP client with bearer injection and 401 interception.

use std::sync::{Arc, OnceLock};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::store::TokenStore;
use crate::auth::token::TokenKind;
use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use crate::error::{ClientError, Result};
use crate::session::{SessionController, SessionEvents};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Client for the SignalTrace JSON envelope protocol.
///
/// Every request resolves a relative endpoint against one configured base
/// URL, sends and receives `application/json`, and decodes the body into an
/// [`ApiResponse`]. Authenticated requests carry the stored access token as a
/// bearer header; a 401 on such a request never reaches the caller as-is —
/// it triggers the automatic-logout path and is replaced by the fixed
/// session-expired envelope.
///
/// No retries, no automatic token refresh: the refresh token is only used
/// opportunistically by logout's best-effort server call.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    store: Arc<dyn TokenStore>,
    session: Arc<SessionController>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = shared_client().clone();
        let session = Arc::new(SessionController::new(
            config.token_store.clone(),
            SessionEvents::new(),
            config.sign_out,
            config.sign_out_delay,
            config.base_url.clone(),
            http.clone(),
        ));
        Self {
            base_url: config.base_url,
            store: config.token_store,
            session,
            http,
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn session(&self) -> &Arc<SessionController> {
        &self.session
    }

    pub fn events(&self) -> &SessionEvents {
        self.session.events()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    fn headers(&self, requires_auth: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if requires_auth {
            if let Some(token) = self.store.get(TokenKind::Access) {
                if let Ok(val) = HeaderValue::from_str(&format!("Bearer {token}")) {
                    headers.insert(AUTHORIZATION, val);
                }
            }
        }
        headers
    }

    /// Issue one request and decode the envelope.
    ///
    /// A 401 on an authenticated request is absorbed: the session controller
    /// runs the automatic-logout sequence (idempotent under concurrency) and
    /// the caller receives [`ApiResponse::session_expired`] instead of the
    /// backend's body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<ApiResponse<T>> {
        let mut request = self
            .http
            .request(method.clone(), self.url(endpoint))
            .headers(self.headers(requires_auth));
        if let Some(body) = &body {
            request = request.json(body);
        }
        debug!(%method, endpoint, requires_auth, "issuing API request");

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && requires_auth {
            debug!(endpoint, "authenticated request rejected with 401; forcing logout");
            self.session.handle_logout(true).await;
            return Ok(ApiResponse::session_expired());
        }

        let text = response.text().await?;
        match serde_json::from_str::<ApiResponse<T>>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(err) if status.is_success() => Err(ClientError::Serialization(err)),
            // Non-success bodies that are not envelopes (proxy errors, HTML
            // pages) surface with their status.
            Err(_) => Err(ClientError::api(status.as_u16(), text)),
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<ApiResponse<T>> {
        self.request(Method::GET, endpoint, None, requires_auth).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<ApiResponse<T>> {
        self.request(Method::POST, endpoint, body, requires_auth).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<ApiResponse<T>> {
        self.request(Method::PUT, endpoint, body, requires_auth).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<ApiResponse<T>> {
        self.request(Method::PATCH, endpoint, body, requires_auth).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<ApiResponse<T>> {
        self.request(Method::DELETE, endpoint, None, requires_auth).await
    }
}
