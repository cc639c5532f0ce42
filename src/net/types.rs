//! Wire types for the account API.
//!
//! Every endpoint answers with the same envelope; `data` payloads are
//! deserialized into the typed records below by `net::ops`.

use serde_json::Value;

/// Uniform response envelope returned by every endpoint.
///
/// A request is a failure whenever `success` is false, even when the
/// transport status is 2xx.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub details: Option<Value>,
}

impl ApiEnvelope {
    /// Parse an envelope out of a response body. Bodies that are not an
    /// envelope (empty, non-object) decode to the failed default.
    pub fn from_body(body: &Value) -> Self {
        serde_json::from_value(body.clone()).unwrap_or_default()
    }
}

/// The authenticated account holder.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub is_active: bool,
    /// Opaque display string; the numeric amount lives in [`Balance`].
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// `POST /auth/login` payload.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: User,
    pub access_token: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// `POST /auth/refresh` payload.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshData {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// `GET /auth/validate` and `GET`/`PUT /user/profile` payload.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ProfileData {
    pub user: User,
}

/// `GET /user/balance` payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub balance: String,
    pub numeric_balance: f64,
    pub currency: String,
    pub last_updated: String,
}

/// `GET /user/summary` payload wrapper.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct SummaryData {
    pub summary: AccountSummary,
}

/// Aggregated account view.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: String,
    pub display_name: String,
    pub email: String,
    pub balance: String,
    #[serde(default)]
    pub company: Option<String>,
    pub account_status: String,
    /// Percentage, 0..=100.
    pub profile_completeness: u32,
    pub last_activity: String,
    pub security_level: String,
}

/// Partial profile update; absent fields are left untouched server-side.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}
