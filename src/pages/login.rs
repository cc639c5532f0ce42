//! Login page with a schema-validated credential form.
//!
//! Invalid credentials surface inline on both fields; other failures show
//! on a form-level status line. A successful login lands on the preserved
//! destination from the `from` query parameter, or the dashboard.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

#[cfg(any(test, feature = "hydrate"))]
use crate::net::error::{ApiError, ErrorKind};
use crate::state::session::SessionState;
use crate::util::validate::{LoginErrors, validate_login};

/// Map a login failure onto the form: invalid credentials flag both fields
/// inline, anything else (network, server) lands on the form-level status
/// line since it says nothing about the credentials.
#[cfg(any(test, feature = "hydrate"))]
fn failure_presentation(err: &ApiError) -> (LoginErrors, Option<String>) {
    if err.kind == ErrorKind::Auth {
        let message = "Invalid email or password".to_owned();
        (
            LoginErrors {
                email: Some(message.clone()),
                password: Some(message),
            },
            None,
        )
    } else {
        (LoginErrors::default(), Some(err.to_string()))
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let query = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(LoginErrors::default());
    let form_error = RwSignal::new(Option::<String>::None);
    let pending = RwSignal::new(false);

    // Already signed in: skip the form.
    {
        let navigate = navigate.clone();
        Effect::new(move || {
            let state = session.get();
            if !state.loading && state.is_authenticated && state.user.is_some() {
                navigate("/", NavigateOptions::default());
            }
        });
    }

    let submit = Callback::new(move |()| {
        let checked = validate_login(&email.get_untracked(), &password.get_untracked());
        if !checked.is_empty() {
            errors.set(checked);
            return;
        }
        errors.set(LoginErrors::default());
        form_error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let destination = query
                .with_untracked(|q| q.get("from"))
                .filter(|from| from.starts_with('/'))
                .unwrap_or_else(|| "/".to_owned());
            pending.set(true);
            leptos::task::spawn_local(async move {
                let client = crate::net::browser::client();
                let result = crate::net::ops::login(
                    client.as_ref(),
                    email.get_untracked().trim(),
                    &password.get_untracked(),
                )
                .await;
                pending.set(false);
                match result {
                    Ok(data) => {
                        session.update(|s| s.apply_login(data.user, data.csrf_token));
                        crate::state::session::commit(session);
                        navigate(&destination, NavigateOptions::default());
                    }
                    Err(err) => {
                        session.update(|s| s.apply_login_failure(err.to_string()));
                        crate::state::session::commit(session);
                        let (field_errors, form) = failure_presentation(&err);
                        errors.set(field_errors);
                        form_error.set(form);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &query;
            let _ = &navigate;
        }
    });

    view! {
        <div class="login-page">
            <form
                class="login-card"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    submit.run(());
                }
            >
                <h1>"Sign in"</h1>
                <label class="field">
                    "Email"
                    <input
                        class="field__input"
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <Show when=move || errors.get().email.is_some()>
                    <p class="field__error">{move || errors.get().email.unwrap_or_default()}</p>
                </Show>
                <label class="field">
                    "Password"
                    <input
                        class="field__input"
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <Show when=move || errors.get().password.is_some()>
                    <p class="field__error">{move || errors.get().password.unwrap_or_default()}</p>
                </Show>
                <Show when=move || form_error.get().is_some()>
                    <p class="login-card__status">{move || form_error.get().unwrap_or_default()}</p>
                </Show>
                <button class="btn btn--primary" type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
