use serde::{Deserialize, Serialize};

/// Bearer-token pair returned by the backend on successful authentication.
///
/// Both values are opaque; the client never inspects or refreshes them. The
/// refresh token is only sent back to the server during logout so it can be
/// blacklisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
}

impl SessionTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Which of the two stored tokens to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}
