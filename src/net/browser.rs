//! Browser-side wiring: the shared API client and the session-effect glue
//! between `net::ops` and the reactive stores.

use std::rc::Rc;

use leptos::prelude::{RwSignal, Update, WithUntracked};

use crate::net::cache::{QueryCache, QueryKey};
use crate::net::error::{ApiError, ErrorKind};
use crate::net::http::{ApiClient, GlooTransport};
use crate::net::ops;
use crate::state::session::{self, SessionState, ValidationEffect};
use crate::util::time::now_ms;

thread_local! {
    static CLIENT: Rc<ApiClient<GlooTransport>> =
        Rc::new(ApiClient::new(GlooTransport, "/api"));
}

/// The process-wide API client. Token state lives inside it, so every caller
/// must share one instance.
pub fn client() -> Rc<ApiClient<GlooTransport>> {
    CLIENT.with(Rc::clone)
}

/// Validate the stored session against the server, applying the documented
/// store effects: fresh user on success, full clear on 401/403, no store
/// change on other failures. Single attempt, gated by the validate
/// staleness window.
pub async fn run_validate(session: RwSignal<SessionState>, cache: RwSignal<QueryCache>) {
    let already_fresh =
        cache.with_untracked(|c| c.fresh(QueryKey::Validate, now_ms()).is_some());
    if already_fresh {
        return;
    }

    let client = client();
    let outcome = ops::validate_token(client.as_ref()).await;
    if let Err(err) = &outcome {
        leptos::logging::warn!("session validation failed: {err}");
    }

    let effect = session
        .try_update(|s| s.apply_validation(outcome))
        .unwrap_or(ValidationEffect::Kept);
    match effect {
        ValidationEffect::Refreshed => {
            cache.update(|c| c.insert(QueryKey::Validate, serde_json::Value::Bool(true), now_ms()));
            session::commit(session);
        }
        ValidationEffect::Dropped => {
            client.clear_tokens();
            cache.update(QueryCache::clear);
            session::commit(session);
        }
        ValidationEffect::Kept => {}
    }
}

/// Refresh the bearer token and the cached user. A failed refresh cascade
/// drops the whole session.
pub async fn run_refresh(session: RwSignal<SessionState>, cache: RwSignal<QueryCache>) {
    let client = client();
    match ops::refresh_session(client.as_ref()).await {
        Ok(user) => {
            if let Ok(value) = serde_json::to_value(&user) {
                cache.update(|c| c.insert(QueryKey::CurrentUser, value, now_ms()));
            }
            session.update(|s| s.apply_validated_user(user));
            session::commit(session);
        }
        Err(err) => {
            leptos::logging::warn!("session refresh failed: {err}");
            drop_session(session, cache);
        }
    }
}

/// Shared handling for a terminal auth failure out of any operation: clears
/// tokens, cache, and the session store. Returns true when it applied.
pub fn handle_auth_failure(
    session: RwSignal<SessionState>,
    cache: RwSignal<QueryCache>,
    err: &ApiError,
) -> bool {
    if err.kind != ErrorKind::Auth {
        return false;
    }
    drop_session(session, cache);
    true
}

fn drop_session(session: RwSignal<SessionState>, cache: RwSignal<QueryCache>) {
    client().clear_tokens();
    cache.update(QueryCache::clear);
    session.update(SessionState::clear_auth);
    session::commit(session);
}
