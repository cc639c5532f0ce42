//! Full-page blocking notice for inactive accounts.

use leptos::prelude::*;

/// Shown instead of protected content when the account is flagged inactive.
/// Offers a support contact action; there is no way past it client-side.
#[component]
pub fn InactiveNotice() -> impl IntoView {
    view! {
        <div class="inactive-notice">
            <h1>"Account inactive"</h1>
            <p>
                "Your account is currently inactive. Protected areas are "
                "unavailable until it is reactivated."
            </p>
            <a class="btn btn--primary" href="mailto:support@example.com">
                "Contact support"
            </a>
        </div>
    }
}
