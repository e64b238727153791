//! Convenience re-exports for typical SDK usage.

pub use crate::auth::{
    AuthService, ChangePasswordRequest, FileTokenStore, LoginRequest, MemoryTokenStore,
    OtpChallenge, OtpPurpose, OtpRequest, ProfileUpdate, ResetPasswordRequest, SessionTokens,
    SignupRequest, SignupVerifyRequest, TokenKind, TokenStore, User,
};
pub use crate::config::ClientConfig;
pub use crate::envelope::{normalize_errors, ApiResponse, FieldError};
pub use crate::error::{ClientError, Result};
pub use crate::http::ApiClient;
pub use crate::prospects::{NewProspect, Prospect, ProspectPatch, ProspectService, ProspectStatus};
pub use crate::session::{AuthEvent, SessionController, SessionEvents};
pub use crate::support::{ContactMessage, SupportService};
