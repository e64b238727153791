//! Session change events and logout orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::auth::store::TokenStore;
use crate::auth::token::TokenKind;

/// Delay between the logged-out notification and the sign-out hook, so an
/// embedding UI can render the notification before navigation.
pub const LOGOUT_SIGN_OUT_DELAY: Duration = Duration::from_millis(1500);

const LOGOUT_ENDPOINT: &str = "/api/auth/logout/";

/// Broadcast signal of session changes — the only cross-component channel
/// through which the rest of an application learns the session changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Tokens were persisted after a successful login or OTP verification.
    SignedIn,
    /// Tokens were cleared. `automatic` distinguishes session expiry from a
    /// user-initiated logout.
    SignedOut { automatic: bool },
}

/// Fan-out channel for [`AuthEvent`]s.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Send an event to all current subscribers. A send with no subscribers
    /// is not an error.
    pub fn emit(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback invoked once a logout sequence completes; the SDK analogue of
/// redirecting the browser to the sign-in page.
pub type SignOutHook = Arc<dyn Fn() + Send + Sync>;

/// Orchestrates logout: token clearing, best-effort server-side token
/// blacklisting, the signed-out notification, and the sign-out hook.
///
/// A two-state guard (idle / logging out) collapses concurrent triggers into
/// a single sequence: when several in-flight requests all hit an expired
/// session, only the first caller executes the side effects.
pub struct SessionController {
    logging_out: Arc<AtomicBool>,
    store: Arc<dyn TokenStore>,
    events: SessionEvents,
    sign_out: SignOutHook,
    sign_out_delay: Duration,
    base_url: String,
    http: reqwest::Client,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn TokenStore>,
        events: SessionEvents,
        sign_out: SignOutHook,
        sign_out_delay: Duration,
        base_url: String,
        http: reqwest::Client,
    ) -> Self {
        Self {
            logging_out: Arc::new(AtomicBool::new(false)),
            store,
            events,
            sign_out,
            sign_out_delay,
            base_url,
            http,
        }
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Run the logout sequence, or return immediately if one is already in
    /// progress.
    ///
    /// Order matters: the store is cleared and the signed-out event emitted
    /// *before* any network traffic, so subscribers observe the logged-out
    /// state even if the server call stalls. The server-side invalidation is
    /// best-effort; its failure is logged and swallowed. The sign-out hook
    /// fires once, after [`sign_out_delay`](Self::new), on a background task.
    pub async fn handle_logout(&self, automatic: bool) {
        if self
            .logging_out
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("logout already in progress; ignoring");
            return;
        }

        // The refresh token must be read before the store is cleared.
        let refresh = self.store.get(TokenKind::Refresh);
        self.store.clear();
        self.events.emit(AuthEvent::SignedOut { automatic });

        if let Some(refresh) = refresh {
            self.invalidate_server_session(&refresh).await;
        }

        let logging_out = self.logging_out.clone();
        let sign_out = self.sign_out.clone();
        let delay = self.sign_out_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sign_out();
            logging_out.store(false, Ordering::SeqCst);
        });
    }

    /// Best-effort POST to the logout endpoint so the server can blacklist
    /// the refresh token. Issued without a bearer header: an expired session
    /// must not bounce back through the 401 interception that triggered us.
    async fn invalidate_server_session(&self, refresh: &str) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            LOGOUT_ENDPOINT
        );
        let body = serde_json::json!({ "refresh_token": refresh });
        match self.http.post(&url).headers(headers).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("server session invalidated");
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "server-side logout rejected; continuing");
            }
            Err(err) => {
                warn!(%err, "server-side logout failed; continuing");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryTokenStore;
    use crate::auth::token::SessionTokens;
    use std::sync::atomic::AtomicUsize;

    fn controller(
        store: Arc<MemoryTokenStore>,
        hook_count: Arc<AtomicUsize>,
    ) -> SessionController {
        let hook_count = hook_count.clone();
        SessionController::new(
            store,
            SessionEvents::new(),
            Arc::new(move || {
                hook_count.fetch_add(1, Ordering::SeqCst);
            }),
            Duration::from_millis(10),
            // Nothing listens here; the server call is best-effort and its
            // failure must be swallowed.
            "http://127.0.0.1:9".to_string(),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn logout_clears_store_and_emits_event() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(&SessionTokens::new("A", "R"));
        let hook_count = Arc::new(AtomicUsize::new(0));
        let ctrl = controller(store.clone(), hook_count.clone());
        let mut rx = ctrl.events().subscribe();

        ctrl.handle_logout(true).await;

        assert!(store.get(TokenKind::Access).is_none());
        assert!(store.get(TokenKind::Refresh).is_none());
        assert_eq!(rx.try_recv().unwrap(), AuthEvent::SignedOut { automatic: true });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hook_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reentrant_logout_is_a_noop() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(&SessionTokens::new("A", "R"));
        let hook_count = Arc::new(AtomicUsize::new(0));
        let ctrl = Arc::new(controller(store.clone(), hook_count.clone()));
        let mut rx = ctrl.events().subscribe();

        tokio::join!(ctrl.handle_logout(true), ctrl.handle_logout(true));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err(), "second logout must not emit");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hook_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn manual_logout_is_flagged_as_not_automatic() {
        let store = Arc::new(MemoryTokenStore::new());
        let hook_count = Arc::new(AtomicUsize::new(0));
        let ctrl = controller(store, hook_count);
        let mut rx = ctrl.events().subscribe();

        ctrl.handle_logout(false).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            AuthEvent::SignedOut { automatic: false }
        );
    }

    #[tokio::test]
    async fn controller_resets_to_idle_after_hook() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(&SessionTokens::new("A", "R"));
        let hook_count = Arc::new(AtomicUsize::new(0));
        let ctrl = controller(store.clone(), hook_count.clone());

        ctrl.handle_logout(true).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        // A later expiry event starts a fresh sequence.
        store.set(&SessionTokens::new("A2", "R2"));
        ctrl.handle_logout(true).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hook_count.load(Ordering::SeqCst), 2);
        assert!(store.get(TokenKind::Access).is_none());
    }
}
