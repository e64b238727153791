//! Prospect CRUD over the authenticated API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::http::ApiClient;

/// Pipeline temperature of a prospect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProspectStatus {
    #[default]
    Cold,
    Warm,
    Hot,
}

/// A prospect record as the backend returns it. `intent_score` and the
/// timestamps are server-owned and ignored on writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    pub id: i64,
    pub full_name: String,
    pub company_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: String,
    pub status: ProspectStatus,
    #[serde(default)]
    pub intent_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a prospect (also the full-replace shape for
/// PUT). Only name and company are required.
#[derive(Debug, Clone, Serialize)]
pub struct NewProspect {
    pub full_name: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProspectStatus>,
}

impl NewProspect {
    pub fn new(full_name: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            company_name: company_name.into(),
            title: None,
            email: None,
            linkedin_url: None,
            website: None,
            industry: None,
            status: None,
        }
    }
}

/// Partial update for PATCH; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProspectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProspectStatus>,
}

/// `data` payload of the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProspectList {
    pub prospects: Vec<Prospect>,
}

/// `data` payload of the single-record endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProspectData {
    pub prospect: Prospect,
}

/// Typed CRUD request builders for `/api/prospects/`. Every call is
/// authenticated; an expired session surfaces as the uniform
/// session-expired envelope from the HTTP layer.
pub struct ProspectService {
    api: ApiClient,
}

impl ProspectService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn detail_endpoint(id: i64) -> String {
        format!("/api/prospects/{id}/")
    }

    /// List the signed-in user's prospects, backend-ordered by intent score.
    pub async fn list(&self) -> Result<ApiResponse<ProspectList>> {
        self.api.get("/api/prospects/", true).await
    }

    pub async fn create(&self, prospect: &NewProspect) -> Result<ApiResponse<ProspectData>> {
        self.api
            .post("/api/prospects/", Some(serde_json::to_value(prospect)?), true)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<ApiResponse<ProspectData>> {
        self.api.get(&Self::detail_endpoint(id), true).await
    }

    /// Full replace of a prospect's editable fields.
    pub async fn update(
        &self,
        id: i64,
        prospect: &NewProspect,
    ) -> Result<ApiResponse<ProspectData>> {
        self.api
            .put(
                &Self::detail_endpoint(id),
                Some(serde_json::to_value(prospect)?),
                true,
            )
            .await
    }

    /// Update only the provided fields.
    pub async fn update_partial(
        &self,
        id: i64,
        patch: &ProspectPatch,
    ) -> Result<ApiResponse<ProspectData>> {
        self.api
            .patch(
                &Self::detail_endpoint(id),
                Some(serde_json::to_value(patch)?),
                true,
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<Value>> {
        self.api.delete(&Self::detail_endpoint(id), true).await
    }
}
