//! Hard navigation helpers. Requires a browser environment.

/// Navigate to the login entry point, discarding in-page state. Used when a
/// token refresh is exhausted and after logout.
pub fn force_login() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
    }
}
