//! Observable session store: the client-held belief about who is signed in.
//!
//! No network calls originate here. Operations in `net::ops` produce typed
//! outcomes; the `apply_*` methods below are the only mutation paths, so
//! `is_authenticated` and `user` stay co-assigned. The durable subset
//! (`user`, `is_authenticated`, `csrf_token`) is persisted through
//! `util::persist` after every committed mutation; `loading` and `error`
//! are re-derived per session and never stored.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::error::{ApiError, ErrorKind};
use crate::net::types::User;

/// Process-wide session state, provided as a single reactive context.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// Mirrored from the most recent server response that carried one.
    pub csrf_token: Option<String>,
    /// True until the persisted session has been rehydrated (or ruled out).
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            csrf_token: None,
            loading: true,
            error: None,
        }
    }
}

/// Partial update for [`SessionState::set_auth_state`]; `None` leaves the
/// field untouched.
#[derive(Clone, Debug, Default)]
pub struct AuthPatch {
    pub user: Option<Option<User>>,
    pub is_authenticated: Option<bool>,
    pub csrf_token: Option<Option<String>>,
}

/// What applying a server-side validation outcome did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationEffect {
    /// Fresh user applied, authentication kept.
    Refreshed,
    /// 401/403: the session was cleared.
    Dropped,
    /// Transient failure: the session was left untouched.
    Kept,
}

/// The subset that survives a reload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub csrf_token: Option<String>,
}

impl SessionState {
    /// Shallow-merge the given fields into the session.
    pub fn set_auth_state(&mut self, patch: AuthPatch) {
        if let Some(user) = patch.user {
            self.user = user;
        }
        if let Some(is_authenticated) = patch.is_authenticated {
            self.is_authenticated = is_authenticated;
        }
        if let Some(csrf_token) = patch.csrf_token {
            self.csrf_token = csrf_token;
        }
    }

    /// Reset to the empty, determined session. Idempotent.
    pub fn clear_auth(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.csrf_token = None;
        self.loading = false;
        self.error = None;
    }

    /// Replace `user` only.
    pub fn update_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Successful login: the three auth fields are assigned together.
    pub fn apply_login(&mut self, user: User, csrf_token: Option<String>) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.csrf_token = csrf_token;
        self.loading = false;
        self.error = None;
    }

    /// Failed login: empty session plus the surfaced message.
    pub fn apply_login_failure(&mut self, message: impl Into<String>) {
        self.clear_auth();
        self.error = Some(message.into());
    }

    /// Successful validation/refresh: fresh user, authentication kept.
    pub fn apply_validated_user(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.loading = false;
    }

    /// Apply a `validate_token` outcome: fresh user on success, full clear
    /// on an auth rejection, no change on any other failure. The returned
    /// effect tells the caller which cache/token teardown to run.
    pub fn apply_validation(&mut self, outcome: Result<User, ApiError>) -> ValidationEffect {
        match outcome {
            Ok(user) => {
                self.apply_validated_user(user);
                ValidationEffect::Refreshed
            }
            Err(err) if err.kind == ErrorKind::Auth => {
                self.clear_auth();
                ValidationEffect::Dropped
            }
            Err(_) => ValidationEffect::Kept,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
            csrf_token: self.csrf_token.clone(),
        }
    }

    /// Rehydrate from a persisted snapshot; loading and error start clean.
    pub fn restore(snapshot: SessionSnapshot) -> Self {
        Self {
            user: snapshot.user,
            is_authenticated: snapshot.is_authenticated,
            csrf_token: snapshot.csrf_token,
            loading: false,
            error: None,
        }
    }
}

/// Persist the durable subset after a committed mutation.
pub fn commit(session: leptos::prelude::RwSignal<SessionState>) {
    use leptos::prelude::WithUntracked;

    let snapshot = session.with_untracked(SessionState::snapshot);
    crate::util::persist::save(&snapshot);
}
