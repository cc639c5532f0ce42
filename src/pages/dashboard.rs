//! Dashboard page: greeting, account status, and entry cards.

use leptos::prelude::*;

use crate::components::nav_bar::NavBar;
use crate::net::cache::QueryCache;
use crate::net::types::User;
use crate::state::session::SessionState;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();
    let tick = expect_context::<crate::app::RevalidateTick>();

    // Keep the displayed user fresh through the cached current-user query.
    let _user = LocalResource::new(move || {
        tick.0.get();
        load_current_user(session, cache)
    });

    let greeting = move || {
        session
            .get()
            .user
            .map_or_else(|| "Welcome".to_owned(), |u| format!("Welcome back, {}", u.name))
    };
    let email = move || session.get().user.map(|u| u.email).unwrap_or_default();
    let status = move || {
        session.get().user.map_or("unknown", |u| {
            if u.is_active { "active" } else { "inactive" }
        })
    };
    let balance_teaser = move || {
        session
            .get()
            .user
            .and_then(|u| u.balance)
            .unwrap_or_else(|| "—".to_owned())
    };

    view! {
        <div class="dashboard-page">
            <NavBar/>
            <header class="dashboard-page__header">
                <h1>{greeting}</h1>
                <p class="dashboard-page__email">{email}</p>
            </header>

            <div class="dashboard-page__cards">
                <a href="/profile" class="dashboard-card">
                    <h2>"Profile"</h2>
                    <p>"Identity details, password, account removal"</p>
                </a>
                <a href="/balance" class="dashboard-card">
                    <h2>"Balance"</h2>
                    <p class="dashboard-card__figure">{balance_teaser}</p>
                </a>
                <a href="/summary" class="dashboard-card">
                    <h2>"Account summary"</h2>
                    <p>{move || format!("Status: {}", status())}</p>
                </a>
            </div>
        </div>
    }
}

/// Fetch the current user through the query cache and mirror it into the
/// session store. Returns the user for resource consumers.
async fn load_current_user(
    session: RwSignal<SessionState>,
    cache: RwSignal<QueryCache>,
) -> Option<User> {
    #[cfg(feature = "hydrate")]
    {
        use crate::net::cache::{QueryKey, fetch_cached};

        let client = crate::net::browser::client();
        let result = fetch_cached(cache, QueryKey::CurrentUser, || {
            let client = client.clone();
            async move { crate::net::ops::fetch_profile(client.as_ref()).await }
        })
        .await;

        match result {
            Ok(Some(user)) => {
                session.update(|s| s.update_user(user.clone()));
                crate::state::session::commit(session);
                Some(user)
            }
            Ok(None) => None,
            Err(err) => {
                if !crate::net::browser::handle_auth_failure(session, cache, &err) {
                    leptos::logging::warn!("current-user fetch failed: {err}");
                }
                None
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (&session, &cache);
        None
    }
}
