//! Typed API operations over the transport wrapper.
//!
//! Each operation performs the remote call sequence and returns a typed
//! outcome; store effects are applied by the caller through the pure
//! `apply_*` methods on `SessionState`, so every piece stays natively
//! testable.

#[cfg(test)]
#[path = "ops_test.rs"]
mod ops_test;

use serde_json::Value;

use crate::net::error::ApiError;
use crate::net::http::{ApiClient, Transport, Verb};
use crate::net::types::{
    AccountSummary, Balance, LoginData, ProfileData, ProfileUpdate, RefreshData, SummaryData, User,
};

/// Authenticate with credentials. On success the returned bearer token is
/// installed as the transport default header.
///
/// # Errors
///
/// Propagates the wrapper error; the caller clears the session on failure.
pub async fn login<T: Transport>(
    client: &ApiClient<T>,
    email: &str,
    password: &str,
) -> Result<LoginData, ApiError> {
    let body = serde_json::json!({ "email": email, "password": password });
    let data = client.request(Verb::Post, "/auth/login", Some(body)).await?;
    let login: LoginData = decode(data)?;
    client.set_bearer(&login.access_token);
    if let Some(csrf) = &login.csrf_token {
        client.set_csrf(csrf);
    }
    Ok(login)
}

/// Best-effort server logout. The transport tokens are cleared regardless of
/// the remote result; a failure is logged, never propagated.
pub async fn logout<T: Transport>(client: &ApiClient<T>) {
    if let Err(err) = client.request(Verb::Post, "/auth/logout", None).await {
        leptos::logging::warn!("logout request failed: {err}");
    }
    client.clear_tokens();
}

/// Check the current session against the server.
///
/// # Errors
///
/// 401/403 means the session is gone; the caller clears the store. Other
/// errors are left to the caller.
pub async fn validate_token<T: Transport>(client: &ApiClient<T>) -> Result<User, ApiError> {
    let data = client.request(Verb::Get, "/auth/validate", None).await?;
    let profile: ProfileData = decode(data)?;
    Ok(profile.user)
}

/// Mint a fresh bearer token, then re-fetch the current user.
///
/// # Errors
///
/// Any failure means the session could not be continued; the caller clears
/// the cache and the store.
pub async fn refresh_session<T: Transport>(client: &ApiClient<T>) -> Result<User, ApiError> {
    let data = client.request(Verb::Post, "/auth/refresh", None).await?;
    let refresh: RefreshData = decode(data)?;
    client.set_bearer(&refresh.access_token);
    if let Some(user) = refresh.user {
        return Ok(user);
    }
    fetch_profile(client).await
}

/// # Errors
///
/// Propagated unmodified; the store is never touched.
pub async fn change_password<T: Transport>(
    client: &ApiClient<T>,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ApiError> {
    let body = serde_json::json!({
        "currentPassword": current,
        "newPassword": new,
        "confirmPassword": confirm,
    });
    client.request(Verb::Post, "/auth/change-password", Some(body)).await?;
    Ok(())
}

/// # Errors
///
/// Propagates the wrapper error.
pub async fn fetch_profile<T: Transport>(client: &ApiClient<T>) -> Result<User, ApiError> {
    let data = client.request(Verb::Get, "/user/profile", None).await?;
    let profile: ProfileData = decode(data)?;
    Ok(profile.user)
}

/// # Errors
///
/// An email conflict comes back as `ErrorKind::Conflict`; see
/// [`ApiError::is_email_conflict`].
pub async fn update_profile<T: Transport>(
    client: &ApiClient<T>,
    update: &ProfileUpdate,
) -> Result<User, ApiError> {
    let body = serde_json::to_value(update).map_err(|e| ApiError::decode(e.to_string()))?;
    let data = client.request(Verb::Put, "/user/profile", Some(body)).await?;
    let profile: ProfileData = decode(data)?;
    Ok(profile.user)
}

/// # Errors
///
/// Propagates the wrapper error.
pub async fn fetch_balance<T: Transport>(client: &ApiClient<T>) -> Result<Balance, ApiError> {
    let data = client.request(Verb::Get, "/user/balance", None).await?;
    decode(data)
}

/// # Errors
///
/// Propagates the wrapper error.
pub async fn fetch_summary<T: Transport>(client: &ApiClient<T>) -> Result<AccountSummary, ApiError> {
    let data = client.request(Verb::Get, "/user/summary", None).await?;
    let summary: SummaryData = decode(data)?;
    Ok(summary.summary)
}

/// Permanently delete the account; requires password confirmation. The
/// transport tokens are cleared on success.
///
/// # Errors
///
/// Propagates the wrapper error.
pub async fn delete_account<T: Transport>(client: &ApiClient<T>, password: &str) -> Result<(), ApiError> {
    let body = serde_json::json!({ "password": password });
    client.request(Verb::Delete, "/user/account", Some(body)).await?;
    client.clear_tokens();
    Ok(())
}

fn decode<D: serde::de::DeserializeOwned>(data: Value) -> Result<D, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::decode(format!("malformed response payload: {e}")))
}
