//! Client-side state for a pending OTP verification.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::Display;

/// Cooldown before another OTP may be requested for the same challenge.
pub const RESEND_COOLDOWN: Duration = Duration::from_secs(60);

/// What a pending OTP authorizes, matching the backend's `otp_type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Signup,
    PasswordReset,
}

/// A pending verification correlating a 6-digit code with a prior signup or
/// forgot-password call.
///
/// Pure state machine; the current time is passed in so tests control the
/// clock. Not persisted — navigating away abandons the challenge.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    email: String,
    purpose: OtpPurpose,
    code: String,
    resend_at: Instant,
}

impl OtpChallenge {
    /// Begin a challenge; the resend cooldown starts immediately since the
    /// backend just sent a code.
    pub fn new(email: impl Into<String>, purpose: OtpPurpose, now: Instant) -> Self {
        Self {
            email: email.into(),
            purpose,
            code: String::new(),
            resend_at: now + RESEND_COOLDOWN,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn purpose(&self) -> OtpPurpose {
        self.purpose
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Record what the user has typed so far.
    pub fn enter_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Whether the entered code has the expected 6-digit shape. The backend
    /// remains the authority; this only gates the submit action.
    pub fn code_is_complete(&self) -> bool {
        self.code.len() == 6 && self.code.chars().all(|c| c.is_ascii_digit())
    }

    pub fn can_resend(&self, now: Instant) -> bool {
        now >= self.resend_at
    }

    /// Whole seconds left on the cooldown, for countdown display.
    pub fn seconds_until_resend(&self, now: Instant) -> u64 {
        self.resend_at.saturating_duration_since(now).as_secs()
    }

    /// A new code was requested: restart the cooldown and drop whatever code
    /// was entered against the old one.
    pub fn mark_resent(&mut self, now: Instant) {
        self.resend_at = now + RESEND_COOLDOWN;
        self.code.clear();
    }
}
