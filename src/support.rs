//! Contact-form submission.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::http::ApiClient;

/// A contact-form submission. Unauthenticated; anyone may write in.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub message: String,
}

pub struct SupportService {
    api: ApiClient,
}

impl SupportService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn send_contact(&self, message: &ContactMessage) -> Result<ApiResponse<Value>> {
        self.api
            .post(
                "/api/support/contact/",
                Some(serde_json::to_value(message)?),
                false,
            )
            .await
    }
}
