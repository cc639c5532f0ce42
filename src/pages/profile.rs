//! Profile page: edit identity fields, change the password, and the danger
//! zone for account deletion.
//!
//! An "email already in use" rejection lands on the email field, not on the
//! generic form surface.

use leptos::prelude::*;

use crate::components::nav_bar::NavBar;
use crate::net::cache::{QueryCache, QueryKey};
use crate::net::types::{ProfileUpdate, User};
use crate::state::session::SessionState;
use crate::util::validate::{
    PasswordChangeErrors, ProfileErrors, validate_password_change, validate_profile,
};

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <div class="profile-page">
            <NavBar/>
            <h1>"Profile"</h1>
            <ProfileForm/>
            <PasswordForm/>
            <DangerZone/>
        </div>
    }
}

/// Identity fields, prefilled from the session user. Only changed fields
/// travel in the update.
#[component]
fn ProfileForm() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();

    let initial = session.get_untracked().user;
    let name = RwSignal::new(initial.as_ref().map(|u| u.name.clone()).unwrap_or_default());
    let email = RwSignal::new(initial.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let phone = RwSignal::new(initial.as_ref().and_then(|u| u.phone.clone()).unwrap_or_default());
    let address =
        RwSignal::new(initial.as_ref().and_then(|u| u.address.clone()).unwrap_or_default());
    let company =
        RwSignal::new(initial.as_ref().and_then(|u| u.company.clone()).unwrap_or_default());

    let errors = RwSignal::new(ProfileErrors::default());
    let status = RwSignal::new(Option::<String>::None);
    let saving = RwSignal::new(false);

    let submit = Callback::new(move |()| {
        let checked = validate_profile(&name.get_untracked(), &email.get_untracked());
        if !checked.is_empty() {
            errors.set(checked);
            return;
        }
        errors.set(ProfileErrors::default());
        status.set(None);

        #[cfg(feature = "hydrate")]
        {
            let update = changed_fields(
                session.get_untracked().user.as_ref(),
                &name.get_untracked(),
                &email.get_untracked(),
                &phone.get_untracked(),
                &address.get_untracked(),
                &company.get_untracked(),
            );
            saving.set(true);
            leptos::task::spawn_local(async move {
                let client = crate::net::browser::client();
                let result = crate::net::ops::update_profile(client.as_ref(), &update).await;
                saving.set(false);
                match result {
                    Ok(user) => {
                        session.update(|s| s.update_user(user));
                        crate::state::session::commit(session);
                        cache.update(|c| {
                            c.invalidate(QueryKey::CurrentUser);
                            c.invalidate(QueryKey::Summary);
                        });
                        status.set(Some("Profile updated".to_owned()));
                    }
                    Err(err) if err.is_email_conflict() => {
                        errors.set(ProfileErrors {
                            name: None,
                            email: Some(err.message.clone()),
                        });
                    }
                    Err(err) => {
                        if !crate::net::browser::handle_auth_failure(session, cache, &err) {
                            status.set(Some(err.to_string()));
                        }
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&session, &cache, &saving, &status);
        }
    });

    view! {
        <form
            class="profile-form"
            on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                submit.run(());
            }
        >
            <h2>"Identity"</h2>
            <label class="field">
                "Name"
                <input
                    class="field__input"
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || errors.get().name.is_some()>
                <p class="field__error">{move || errors.get().name.unwrap_or_default()}</p>
            </Show>
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
                "Phone"
                <input
                    class="field__input"
                    type="tel"
                    prop:value=move || phone.get()
                    on:input=move |ev| phone.set(event_target_value(&ev))
                />
            </label>
            <label class="field">
                "Address"
                <input
                    class="field__input"
                    type="text"
                    prop:value=move || address.get()
                    on:input=move |ev| address.set(event_target_value(&ev))
                />
            </label>
            <label class="field">
                "Company"
                <input
                    class="field__input"
                    type="text"
                    prop:value=move || company.get()
                    on:input=move |ev| company.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || status.get().is_some()>
                <p class="profile-form__status">{move || status.get().unwrap_or_default()}</p>
            </Show>
            <button class="btn btn--primary" type="submit" disabled=move || saving.get()>
                {move || if saving.get() { "Saving..." } else { "Save changes" }}
            </button>
        </form>
    }
}

/// Build a partial update containing only the fields that differ from the
/// current user record.
#[cfg(feature = "hydrate")]
fn changed_fields(
    current: Option<&User>,
    name: &str,
    email: &str,
    phone: &str,
    address: &str,
    company: &str,
) -> ProfileUpdate {
    let differs = |old: Option<&str>, new: &str| old.unwrap_or_default() != new;
    ProfileUpdate {
        name: differs(current.map(|u| u.name.as_str()), name).then(|| name.to_owned()),
        email: differs(current.map(|u| u.email.as_str()), email).then(|| email.to_owned()),
        phone: differs(current.and_then(|u| u.phone.as_deref()), phone).then(|| phone.to_owned()),
        address: differs(current.and_then(|u| u.address.as_deref()), address)
            .then(|| address.to_owned()),
        company: differs(current.and_then(|u| u.company.as_deref()), company)
            .then(|| company.to_owned()),
    }
}

/// Password change; no store mutation on success.
#[component]
fn PasswordForm() -> impl IntoView {
    let current = RwSignal::new(String::new());
    let new = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let errors = RwSignal::new(PasswordChangeErrors::default());
    let status = RwSignal::new(Option::<String>::None);
    let pending = RwSignal::new(false);

    let submit = Callback::new(move |()| {
        let checked = validate_password_change(
            &current.get_untracked(),
            &new.get_untracked(),
            &confirm.get_untracked(),
        );
        if !checked.is_empty() {
            errors.set(checked);
            return;
        }
        errors.set(PasswordChangeErrors::default());
        status.set(None);

        #[cfg(feature = "hydrate")]
        {
            pending.set(true);
            leptos::task::spawn_local(async move {
                let client = crate::net::browser::client();
                let result = crate::net::ops::change_password(
                    client.as_ref(),
                    &current.get_untracked(),
                    &new.get_untracked(),
                    &confirm.get_untracked(),
                )
                .await;
                pending.set(false);
                match result {
                    Ok(()) => {
                        current.set(String::new());
                        new.set(String::new());
                        confirm.set(String::new());
                        status.set(Some("Password updated".to_owned()));
                    }
                    Err(err) => status.set(Some(err.to_string())),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&pending, &status);
        }
    });

    view! {
        <form
            class="password-form"
            on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                submit.run(());
            }
        >
            <h2>"Change password"</h2>
            <label class="field">
                "Current password"
                <input
                    class="field__input"
                    type="password"
                    prop:value=move || current.get()
                    on:input=move |ev| current.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || errors.get().current.is_some()>
                <p class="field__error">{move || errors.get().current.unwrap_or_default()}</p>
            </Show>
            <label class="field">
                "New password"
                <input
                    class="field__input"
                    type="password"
                    prop:value=move || new.get()
                    on:input=move |ev| new.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || errors.get().new.is_some()>
                <p class="field__error">{move || errors.get().new.unwrap_or_default()}</p>
            </Show>
            <label class="field">
                "Confirm new password"
                <input
                    class="field__input"
                    type="password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || errors.get().confirm.is_some()>
                <p class="field__error">{move || errors.get().confirm.unwrap_or_default()}</p>
            </Show>
            <Show when=move || status.get().is_some()>
                <p class="password-form__status">{move || status.get().unwrap_or_default()}</p>
            </Show>
            <button class="btn btn--primary" type="submit" disabled=move || pending.get()>
                {move || if pending.get() { "Updating..." } else { "Update password" }}
            </button>
        </form>
    }
}

/// Account deletion with password confirmation. A successful deletion drops
/// every piece of local state and lands on the login page.
#[component]
fn DangerZone() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let cache = expect_context::<RwSignal<QueryCache>>();

    let password = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let pending = RwSignal::new(false);

    let submit = Callback::new(move |()| {
        if password.get_untracked().is_empty() {
            error.set(Some("Password is required to delete the account".to_owned()));
            return;
        }
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            pending.set(true);
            leptos::task::spawn_local(async move {
                let client = crate::net::browser::client();
                let result =
                    crate::net::ops::delete_account(client.as_ref(), &password.get_untracked())
                        .await;
                pending.set(false);
                match result {
                    Ok(()) => {
                        cache.update(QueryCache::clear);
                        session.update(SessionState::clear_auth);
                        crate::util::persist::clear();
                        crate::util::navigate::force_login();
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&session, &cache, &pending);
        }
    });

    view! {
        <section class="danger-zone">
            <h2>"Danger zone"</h2>
            <p>"Deleting the account is permanent and removes all data."</p>
            <label class="field">
                "Password"
                <input
                    class="field__input"
                    type="password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || error.get().is_some()>
                <p class="field__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <button
                class="btn btn--danger"
                disabled=move || pending.get()
                on:click=move |_| submit.run(())
            >
                {move || if pending.get() { "Deleting..." } else { "Delete account" }}
            </button>
        </section>
    }
}
