//! Typed request builders for the auth endpoints.

use serde_json::{json, Value};
use tracing::debug;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::http::ApiClient;
use crate::session::AuthEvent;

use super::otp::OtpPurpose;
use super::types::{
    AuthPayload, ChangePasswordRequest, EmailData, LoginRequest, OtpRequest, ProfileData,
    ProfileUpdate, ResetPasswordRequest, SignupRequest, SignupVerifyRequest,
};

/// Pure request/response mappings over [`ApiClient`] for the auth endpoints.
///
/// The only behavior beyond forwarding is auto-persistence: login and the two
/// OTP verifications that activate an account each persist the returned token
/// pair and broadcast [`AuthEvent::SignedIn`]. No other call path establishes
/// a session. Failure envelopes come back unmodified for per-field display;
/// no retries are performed.
///
/// # Example
/// ```no_run
/// use sigtrace::auth::{AuthService, LoginRequest};
/// use sigtrace::config::ClientConfig;
/// use sigtrace::http::ApiClient;
///
/// # async fn example() -> sigtrace::error::Result<()> {
/// let auth = AuthService::new(ApiClient::new(ClientConfig::from_env()));
/// let resp = auth
///     .login(&LoginRequest { email: "a@b.com".into(), password: "x".into() })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Authenticate with email and password. Persists the session on success.
    ///
    /// An unverified account comes back as a failure envelope for which
    /// [`ApiResponse::needs_verification`] is true; callers should route to
    /// OTP verification instead of showing a generic error.
    pub async fn login(&self, request: &LoginRequest) -> Result<ApiResponse<AuthPayload>> {
        let response = self
            .api
            .post("/api/auth/login/", Some(serde_json::to_value(request)?), false)
            .await?;
        self.persist_session(&response);
        Ok(response)
    }

    /// Start registration. The backend sends an OTP to the email; no account
    /// exists and no session is established until [`verify_signup`](Self::verify_signup).
    pub async fn signup(&self, request: &SignupRequest) -> Result<ApiResponse<EmailData>> {
        self.api
            .post("/api/auth/signup/", Some(serde_json::to_value(request)?), false)
            .await
    }

    /// Complete registration with the emailed code. Persists the session on
    /// success (the backend creates and activates the account here).
    pub async fn verify_signup(
        &self,
        request: &SignupVerifyRequest,
    ) -> Result<ApiResponse<AuthPayload>> {
        let response = self
            .api
            .post(
                "/api/auth/signup/verify/",
                Some(serde_json::to_value(request)?),
                false,
            )
            .await?;
        self.persist_session(&response);
        Ok(response)
    }

    /// Request a fresh signup OTP for an email mid-registration.
    pub async fn resend_signup_otp(&self, email: &str) -> Result<ApiResponse<EmailData>> {
        self.resend_otp("/api/auth/signup/otp/resend/", email, OtpPurpose::Signup)
            .await
    }

    /// Activate an account whose owner skipped the OTP screen during signup.
    /// Persists the session on success.
    pub async fn verify_account(&self, request: &OtpRequest) -> Result<ApiResponse<AuthPayload>> {
        let response = self
            .api
            .post(
                "/api/auth/verify/otp/",
                Some(serde_json::to_value(request)?),
                false,
            )
            .await?;
        self.persist_session(&response);
        Ok(response)
    }

    /// Request a fresh activation OTP for an unverified account.
    pub async fn resend_account_otp(&self, email: &str) -> Result<ApiResponse<EmailData>> {
        self.resend_otp("/api/auth/verify/otp/resend/", email, OtpPurpose::Signup)
            .await
    }

    /// Start a password reset by emailing an OTP to the account.
    pub async fn forgot_password(&self, email: &str) -> Result<ApiResponse<EmailData>> {
        self.api
            .post(
                "/api/auth/password/forgot/",
                Some(json!({ "email": email })),
                false,
            )
            .await
    }

    /// Check a password-reset OTP without consuming it for a reset yet.
    pub async fn verify_password_reset_otp(
        &self,
        request: &OtpRequest,
    ) -> Result<ApiResponse<EmailData>> {
        self.api
            .post(
                "/api/auth/password/forgot/verify/",
                Some(serde_json::to_value(request)?),
                false,
            )
            .await
    }

    /// Request a fresh password-reset OTP.
    pub async fn resend_password_reset_otp(&self, email: &str) -> Result<ApiResponse<EmailData>> {
        self.resend_otp(
            "/api/auth/password/forgot/otp/resend/",
            email,
            OtpPurpose::PasswordReset,
        )
        .await
    }

    /// Set a new password using a verified reset OTP. Does not sign in.
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ApiResponse<Value>> {
        self.api
            .post(
                "/api/auth/password/reset/",
                Some(serde_json::to_value(request)?),
                false,
            )
            .await
    }

    /// Change the signed-in user's password.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<ApiResponse<Value>> {
        self.api
            .post(
                "/api/auth/password/change/",
                Some(serde_json::to_value(request)?),
                true,
            )
            .await
    }

    /// Fetch the signed-in user's profile.
    pub async fn profile(&self) -> Result<ApiResponse<ProfileData>> {
        self.api.get("/api/auth/profile/", true).await
    }

    /// Update profile fields; absent fields are left untouched.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ApiResponse<ProfileData>> {
        self.api
            .put(
                "/api/auth/profile/",
                Some(serde_json::to_value(update)?),
                true,
            )
            .await
    }

    /// User-initiated logout: clears the session, notifies subscribers, and
    /// best-effort invalidates the refresh token server-side.
    pub async fn logout(&self) {
        self.api.session().handle_logout(false).await;
    }

    async fn resend_otp(
        &self,
        endpoint: &str,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<ApiResponse<EmailData>> {
        self.api
            .post(
                endpoint,
                Some(json!({ "email": email, "otp_type": purpose })),
                false,
            )
            .await
    }

    /// Sole path by which a session is established: a successful envelope
    /// carrying tokens persists them and announces the sign-in once.
    fn persist_session(&self, response: &ApiResponse<AuthPayload>) {
        if !response.success {
            return;
        }
        if let Some(data) = &response.data {
            self.api.store().set(&data.tokens);
            self.api.events().emit(AuthEvent::SignedIn);
            debug!(user = data.user.id, "session established");
        }
    }
}
