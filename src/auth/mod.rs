//! Authentication: session tokens, persistence, OTP challenges, and the
//! typed request builders for the auth endpoints.

pub mod otp;
pub mod service;
pub mod store;
pub mod token;
pub mod types;

pub use otp::{OtpChallenge, OtpPurpose, RESEND_COOLDOWN};
pub use service::AuthService;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{SessionTokens, TokenKind};
pub use types::{
    AuthPayload, ChangePasswordRequest, EmailData, LoginRequest, OtpRequest, ProfileData,
    ProfileUpdate, ResetPasswordRequest, SignupRequest, SignupVerifyRequest, User,
};
