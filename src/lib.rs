//! Sigtrace — typed Rust client for the SignalTrace API.
//!
//! Wraps the backend's JSON envelope protocol with typed services for
//! authentication (signup with OTP verification, login, password reset),
//! profile management, and prospect CRUD. Session tokens are persisted
//! through a pluggable [`auth::TokenStore`], and an expired session (a 401 on
//! any authenticated call) triggers exactly one automatic logout regardless
//! of how many requests are in flight.
//!
//! # Quick Start
//!
//! ```no_run
//! use sigtrace::prelude::*;
//!
//! # async fn example() -> sigtrace::error::Result<()> {
//! let api = ApiClient::new(ClientConfig::from_env());
//! let auth = AuthService::new(api.clone());
//! let response = auth
//!     .login(&LoginRequest {
//!         email: "a@b.com".into(),
//!         password: "secret".into(),
//!     })
//!     .await?;
//! if response.success {
//!     let prospects = ProspectService::new(api).list().await?;
//!     println!("{}", prospects.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod prelude;
pub mod prospects;
pub mod session;
pub mod support;
