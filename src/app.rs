//! Root application component with routing, context providers, and the
//! session lifecycle (rehydration, startup validation, periodic refresh,
//! focus/online revalidation).

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::route_guard::RequireActiveAccount;
use crate::net::cache::QueryCache;
use crate::pages::{
    balance::BalancePage, dashboard::DashboardPage, login::LoginPage, profile::ProfilePage,
    summary::SummaryPage,
};
use crate::state::session::SessionState;

/// Interval between background token refreshes.
#[cfg(feature = "hydrate")]
const REFRESH_INTERVAL_MS: u32 = 10 * 60 * 1000;

/// Delay before the startup session validation, so rehydrated pages render
/// before the first network round trip.
#[cfg(feature = "hydrate")]
const STARTUP_VALIDATE_DELAY_MS: u32 = 500;

/// Counter bumped on window focus/online revalidation. Page resources
/// subscribe to it so stale-marked queries refetch.
#[derive(Clone, Copy)]
pub struct RevalidateTick(pub RwSignal<u32>);

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session store, query cache, and revalidation tick to all
/// child components, then sets up client-side routing. Every route except
/// the login page sits behind the active-account guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let cache = RwSignal::new(QueryCache::default());
    let tick = RevalidateTick(RwSignal::new(0));

    provide_context(session);
    provide_context(cache);
    provide_context(tick);

    #[cfg(feature = "hydrate")]
    bootstrap(session, cache, tick);
    #[cfg(not(feature = "hydrate"))]
    {
        // Server render has no persisted session to consult.
        session.update(|s| s.loading = false);
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/account-client.css"/>
        <Title text="Account"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route
                    path=StaticSegment("")
                    view=|| {
                        view! {
                            <RequireActiveAccount>
                                <DashboardPage/>
                            </RequireActiveAccount>
                        }
                    }
                />
                <Route
                    path=StaticSegment("profile")
                    view=|| {
                        view! {
                            <RequireActiveAccount>
                                <ProfilePage/>
                            </RequireActiveAccount>
                        }
                    }
                />
                <Route
                    path=StaticSegment("balance")
                    view=|| {
                        view! {
                            <RequireActiveAccount>
                                <BalancePage/>
                            </RequireActiveAccount>
                        }
                    }
                />
                <Route
                    path=StaticSegment("summary")
                    view=|| {
                        view! {
                            <RequireActiveAccount>
                                <SummaryPage/>
                            </RequireActiveAccount>
                        }
                    }
                />
            </Routes>
        </Router>
    }
}

/// One-time browser startup: rehydrate the persisted session, wire the
/// focus/online revalidation listeners, then schedule the delayed startup
/// validation and the periodic token refresh loop.
#[cfg(feature = "hydrate")]
fn bootstrap(
    session: RwSignal<SessionState>,
    cache: RwSignal<QueryCache>,
    tick: RevalidateTick,
) {
    use gloo_timers::future::TimeoutFuture;

    match crate::util::persist::load() {
        Some(snapshot) => {
            let restored = SessionState::restore(snapshot);
            if let Some(token) = &restored.csrf_token {
                crate::net::browser::client().set_csrf(token.clone());
            }
            session.set(restored);
        }
        None => session.update(|s| s.loading = false),
    }

    crate::net::cache::register_revalidation(move || {
        cache.update(QueryCache::mark_all_stale);
        tick.0.update(|n| *n += 1);
        if session.with_untracked(|s| s.is_authenticated) {
            leptos::task::spawn_local(crate::net::browser::run_validate(session, cache));
        }
    });

    // Let the rehydrated UI paint before the first validation round trip.
    leptos::task::spawn_local(async move {
        TimeoutFuture::new(STARTUP_VALIDATE_DELAY_MS).await;
        if session.with_untracked(|s| s.is_authenticated) {
            crate::net::browser::run_validate(session, cache).await;
        }
    });

    leptos::task::spawn_local(async move {
        loop {
            TimeoutFuture::new(REFRESH_INTERVAL_MS).await;
            if session.with_untracked(|s| s.is_authenticated) {
                crate::net::browser::run_refresh(session, cache).await;
            }
        }
    });
}
