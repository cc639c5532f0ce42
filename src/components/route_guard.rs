//! Route guard gating protected views on session state.
//!
//! The decision is a pure function of the session store; the component just
//! renders the matching branch. Unauthenticated visitors are redirected to
//! the login page with their intended destination preserved.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::components::inactive_notice::InactiveNotice;
use crate::state::session::SessionState;

/// Guard verdict for a protected route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Session not yet determined.
    Loading,
    /// No session; redirect to login.
    Unauthenticated,
    /// Valid session but the account is flagged inactive; block navigation.
    AuthenticatedInactive,
    /// Render protected content.
    AuthenticatedActive,
}

/// Derive the guard verdict from the session store. A session that claims
/// authentication without a user record counts as unauthenticated.
pub fn evaluate(session: &SessionState) -> GuardState {
    if session.loading {
        return GuardState::Loading;
    }
    match (&session.user, session.is_authenticated) {
        (Some(user), true) if user.is_active => GuardState::AuthenticatedActive,
        (Some(_), true) => GuardState::AuthenticatedInactive,
        _ => GuardState::Unauthenticated,
    }
}

/// Build the login redirect URL, carrying the full intended destination
/// (path plus query) in the `from` parameter. Separator characters in the
/// destination are escaped so they survive the outer query string.
fn login_redirect(pathname: &str, search: &str) -> String {
    let mut from = pathname.to_owned();
    if !search.is_empty() {
        from.push('?');
        from.push_str(search);
    }
    let from = from
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('#', "%23")
        .replace('+', "%2B");
    format!("/login?from={from}")
}

/// Wrapper for protected routes: renders its children only for an active,
/// authenticated session.
#[component]
pub fn RequireActiveAccount(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let location = use_location();

    view! {
        {move || match evaluate(&session.get()) {
            GuardState::Loading => view! {
                <div class="guard guard--loading">
                    <p>"Checking session..."</p>
                </div>
            }
            .into_any(),
            GuardState::Unauthenticated => {
                let target = login_redirect(&location.pathname.get(), &location.search.get());
                view! { <Redirect path=target/> }.into_any()
            }
            GuardState::AuthenticatedInactive => view! { <InactiveNotice/> }.into_any(),
            GuardState::AuthenticatedActive => children().into_any(),
        }}
    }
}
