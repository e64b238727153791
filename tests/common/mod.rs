#![allow(dead_code)]

//! Shared harness for wiremock-backed integration tests: an in-memory token
//! store, a counting sign-out hook, and a short logout delay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use sigtrace::auth::{MemoryTokenStore, SessionTokens, TokenStore};
use sigtrace::config::ClientConfig;
use sigtrace::http::ApiClient;

pub struct TestHarness {
    pub api: ApiClient,
    pub store: Arc<MemoryTokenStore>,
    pub sign_outs: Arc<AtomicUsize>,
}

pub fn harness(base_url: &str) -> TestHarness {
    let store = Arc::new(MemoryTokenStore::new());
    let sign_outs = Arc::new(AtomicUsize::new(0));
    let counter = sign_outs.clone();
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_token_store(store.clone())
        .with_sign_out(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .with_sign_out_delay(Duration::from_millis(100));
    TestHarness {
        api: ApiClient::new(config),
        store,
        sign_outs,
    }
}

pub fn signed_in_harness(base_url: &str) -> TestHarness {
    let h = harness(base_url);
    h.store.set(&SessionTokens::new("A", "R"));
    h
}

pub fn sample_user() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "a@b.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "date_joined": "2024-01-15T10:30:00Z",
        "is_active": true
    })
}

pub fn auth_success_body(message: &str) -> serde_json::Value {
    json!({
        "success": true,
        "message": message,
        "data": {
            "user": sample_user(),
            "tokens": {"access": "A", "refresh": "R"}
        }
    })
}

/// Give the background logout task time to run its delayed sign-out hook.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}
