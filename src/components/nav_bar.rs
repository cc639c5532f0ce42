//! Top navigation bar for protected pages.

use leptos::prelude::*;

use crate::net::cache::QueryCache;
use crate::state::session::SessionState;

/// Navigation links, the signed-in user's name, and the logout action.
///
/// Logout is best-effort on the wire: local state, cached queries, and
/// transport tokens are cleared whether or not the server call succeeds.
#[component]
pub fn NavBar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();

    let user_name = move || {
        session
            .get()
            .user
            .map(|u| u.name)
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(async move {
                let client = crate::net::browser::client();
                crate::net::ops::logout(client.as_ref()).await;
                cache.update(QueryCache::clear);
                session.update(SessionState::clear_auth);
                crate::util::persist::clear();
                crate::util::navigate::force_login();
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&session, &cache);
        }
    };

    view! {
        <nav class="nav-bar">
            <span class="nav-bar__brand">"Accounts"</span>
            <a href="/" class="nav-bar__link">"Dashboard"</a>
            <a href="/profile" class="nav-bar__link">"Profile"</a>
            <a href="/balance" class="nav-bar__link">"Balance"</a>
            <a href="/summary" class="nav-bar__link">"Summary"</a>
            <span class="nav-bar__spacer"></span>
            <span class="nav-bar__user">{user_name}</span>
            <button class="btn" on:click=on_logout>
                "Log out"
            </button>
        </nav>
    }
}
