//! Account summary page: cached aggregated view of the account.

use leptos::prelude::*;

use crate::components::nav_bar::NavBar;
use crate::net::cache::{QueryCache, QueryKey};
use crate::net::types::AccountSummary;
use crate::state::session::SessionState;

#[component]
pub fn SummaryPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();
    let tick = expect_context::<crate::app::RevalidateTick>();

    let summary = LocalResource::new(move || {
        tick.0.get();
        load_summary(session, cache)
    });

    view! {
        <div class="summary-page">
            <NavBar/>
            <h1>"Account summary"</h1>

            <Suspense fallback=move || view! { <p>"Loading summary..."</p> }>
                {move || {
                    summary
                        .get()
                        .map(|loaded| match loaded {
                            Some(s) => summary_view(&s).into_any(),
                            None => view! {
                                <p class="summary-page__empty">"Summary unavailable."</p>
                            }
                            .into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}

fn summary_view(summary: &AccountSummary) -> impl IntoView {
    let completeness = summary.profile_completeness.min(100);
    view! {
        <dl class="summary-list">
            <dt>"Account"</dt>
            <dd>{summary.account_id.clone()}</dd>
            <dt>"Name"</dt>
            <dd>{summary.display_name.clone()}</dd>
            <dt>"Email"</dt>
            <dd>{summary.email.clone()}</dd>
            <dt>"Balance"</dt>
            <dd>{summary.balance.clone()}</dd>
            <dt>"Company"</dt>
            <dd>{summary.company.clone().unwrap_or_else(|| "—".to_owned())}</dd>
            <dt>"Status"</dt>
            <dd>{summary.account_status.clone()}</dd>
            <dt>"Security level"</dt>
            <dd>{summary.security_level.clone()}</dd>
            <dt>"Last activity"</dt>
            <dd>{summary.last_activity.clone()}</dd>
            <dt>"Profile completeness"</dt>
            <dd>
                <div class="summary-list__meter">
                    <div
                        class="summary-list__meter-fill"
                        style=format!("width: {completeness}%")
                    ></div>
                </div>
                {format!("{completeness}%")}
            </dd>
        </dl>
    }
}

async fn load_summary(
    session: RwSignal<SessionState>,
    cache: RwSignal<QueryCache>,
) -> Option<AccountSummary> {
    #[cfg(feature = "hydrate")]
    {
        use crate::net::cache::fetch_cached;

        let client = crate::net::browser::client();
        let result = fetch_cached(cache, QueryKey::Summary, || {
            let client = client.clone();
            async move { crate::net::ops::fetch_summary(client.as_ref()).await }
        })
        .await;

        match result {
            Ok(summary) => summary,
            Err(err) => {
                if !crate::net::browser::handle_auth_failure(session, cache, &err) {
                    leptos::logging::warn!("summary fetch failed: {err}");
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
