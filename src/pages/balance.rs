//! Balance page: cached balance read with manual refresh.

use leptos::prelude::*;

use crate::components::nav_bar::NavBar;
use crate::net::cache::{QueryCache, QueryKey};
use crate::net::types::Balance;
use crate::state::session::SessionState;

#[component]
pub fn BalancePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();
    let tick = expect_context::<crate::app::RevalidateTick>();

    let balance = LocalResource::new(move || {
        tick.0.get();
        load_balance(session, cache)
    });

    let on_refresh = move |_| {
        cache.update(|c| c.invalidate(QueryKey::Balance));
        balance.refetch();
    };

    view! {
        <div class="balance-page">
            <NavBar/>
            <header class="balance-page__header">
                <h1>"Balance"</h1>
                <button class="btn" on:click=on_refresh>
                    "Refresh"
                </button>
            </header>

            <Suspense fallback=move || view! { <p>"Loading balance..."</p> }>
                {move || {
                    balance
                        .get()
                        .map(|loaded| match loaded {
                            Some(b) => view! {
                                <div class="balance-card">
                                    <p class="balance-card__figure">{b.balance.clone()}</p>
                                    <p class="balance-card__currency">{b.currency.clone()}</p>
                                    <p class="balance-card__updated">
                                        {format!("Last updated: {}", b.last_updated)}
                                    </p>
                                </div>
                            }
                            .into_any(),
                            None => view! {
                                <p class="balance-page__empty">"Balance unavailable."</p>
                            }
                            .into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}

async fn load_balance(
    session: RwSignal<SessionState>,
    cache: RwSignal<QueryCache>,
) -> Option<Balance> {
    #[cfg(feature = "hydrate")]
    {
        use crate::net::cache::fetch_cached;

        let client = crate::net::browser::client();
        let result = fetch_cached(cache, QueryKey::Balance, || {
            let client = client.clone();
            async move { crate::net::ops::fetch_balance(client.as_ref()).await }
        })
        .await;

        match result {
            Ok(balance) => balance,
            Err(err) => {
                if !crate::net::browser::handle_auth_failure(session, cache, &err) {
                    leptos::logging::warn!("balance fetch failed: {err}");
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
