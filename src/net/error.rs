//! Uniform error shape for everything that crosses the transport wrapper.
//!
//! Classification prefers the structured `error` code from the envelope;
//! message sniffing is kept only as a compatibility shim for server builds
//! that predate error codes.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use crate::net::types::ApiEnvelope;

/// Error taxonomy for the account client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-side schema rejection; never reaches the network.
    Validation,
    /// 401/403: invalid credentials or an expired/invalid session.
    Auth,
    /// Uniqueness conflict, e.g. an email already in use.
    Conflict,
    /// Transport failure, no response.
    Network,
    /// `success:false` or any other server-side failure.
    Server,
}

/// Uniform error carried out of the transport wrapper.
#[derive(Clone, Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    /// Structured code from the envelope's `error` field, when present.
    pub code: Option<String>,
    /// Original response body, for callers that need the details.
    pub body: Option<Value>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Validation, message: message.into(), status: None, code: None, body: None }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Network, message: message.into(), status: None, code: None, body: None }
    }

    /// A 2xx response whose payload could not be decoded into the expected
    /// shape.
    pub fn decode(message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Server, message: message.into(), status: None, code: None, body: None }
    }

    /// Build an error from an HTTP status and the parsed envelope.
    pub fn from_response(status: u16, envelope: &ApiEnvelope, body: &Value) -> Self {
        let message = if envelope.message.is_empty() {
            format!("request failed with status {status}")
        } else {
            envelope.message.clone()
        };
        let kind = classify(Some(status), envelope.error.as_deref(), &message);
        Self {
            kind,
            message,
            status: Some(status),
            code: envelope.error.clone(),
            body: Some(body.clone()),
        }
    }

    /// Build an error from a `success:false` envelope on a 2xx response.
    pub fn from_envelope(envelope: &ApiEnvelope, body: &Value) -> Self {
        let message = if envelope.message.is_empty() {
            "request failed".to_owned()
        } else {
            envelope.message.clone()
        };
        let kind = classify(None, envelope.error.as_deref(), &message);
        Self { kind, message, status: None, code: envelope.error.clone(), body: Some(body.clone()) }
    }

    /// True when the server rejected an email as already taken. Used to route
    /// the failure to the email field instead of a generic surface.
    pub fn is_email_conflict(&self) -> bool {
        self.code.as_deref() == Some("EMAIL_IN_USE") || sniff_email_conflict(&self.message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Map a status/code/message triple onto the taxonomy. Codes win over
/// statuses, statuses win over message sniffing.
pub fn classify(status: Option<u16>, code: Option<&str>, message: &str) -> ErrorKind {
    match code {
        Some("INVALID_CREDENTIALS" | "TOKEN_EXPIRED" | "SESSION_EXPIRED") => return ErrorKind::Auth,
        Some("EMAIL_IN_USE") => return ErrorKind::Conflict,
        _ => {}
    }
    match status {
        Some(401 | 403) => ErrorKind::Auth,
        Some(409) => ErrorKind::Conflict,
        _ if sniff_email_conflict(message) => ErrorKind::Conflict,
        _ => ErrorKind::Server,
    }
}

// Compatibility shim: older server builds signal the conflict only in the
// human-readable message.
fn sniff_email_conflict(message: &str) -> bool {
    message.to_lowercase().contains("email already in use")
}
