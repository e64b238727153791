//! Wire types for the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::SessionTokens;

/// Identity record returned by the backend. Opaque passthrough; the client
/// never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
    pub is_active: bool,
}

/// `data` payload of every response that establishes a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub tokens: SessionTokens,
}

/// `data` payload of `GET`/`PUT /api/auth/profile/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub user: User,
}

/// `data` payload of calls that only echo the target email (signup start,
/// OTP resend, forgot-password).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailData {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
}

/// Signup fields plus the OTP code; the backend re-validates everything and
/// creates the account only when the code checks out.
#[derive(Debug, Clone, Serialize)]
pub struct SignupVerifyRequest {
    #[serde(flatten)]
    pub signup: SignupRequest,
    pub otp_code: String,
}

/// Email + 6-digit code, used by both signup and password-reset verification.
#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp_code: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
