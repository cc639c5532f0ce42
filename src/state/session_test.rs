use super::*;

fn user() -> User {
    User {
        id: 1,
        name: "John Doe".to_owned(),
        email: "john.doe@example.com".to_owned(),
        phone: Some("+1 555 0100".to_owned()),
        address: Some("1 Main St".to_owned()),
        company: Some("Acme Corp".to_owned()),
        is_active: true,
        balance: Some("$1,234.56".to_owned()),
        age: Some(34),
        eye_color: Some("green".to_owned()),
        picture: None,
    }
}

fn authenticated() -> SessionState {
    let mut state = SessionState::default();
    state.apply_login(user(), Some("csrf".to_owned()));
    state
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_session_is_empty_and_undetermined() {
    let state = SessionState::default();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(state.csrf_token.is_none());
    assert!(state.loading);
    assert!(state.error.is_none());
}

// =============================================================
// Login transitions
// =============================================================

#[test]
fn apply_login_co_assigns_the_auth_fields() {
    let state = authenticated();
    assert_eq!(state.user, Some(user()));
    assert!(state.is_authenticated);
    assert_eq!(state.csrf_token.as_deref(), Some("csrf"));
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn apply_login_failure_clears_session_and_records_message() {
    let mut state = authenticated();
    state.apply_login_failure("Invalid credentials");

    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(state.csrf_token.is_none());
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
}

#[test]
fn apply_validated_user_keeps_authentication() {
    let mut state = authenticated();
    let mut fresh = user();
    fresh.name = "John Q. Doe".to_owned();
    state.apply_validated_user(fresh.clone());

    assert_eq!(state.user, Some(fresh));
    assert!(state.is_authenticated);
    assert_eq!(state.csrf_token.as_deref(), Some("csrf"));
}

// =============================================================
// clear_auth
// =============================================================

#[test]
fn clear_auth_is_idempotent() {
    let mut once = authenticated();
    once.clear_auth();

    let mut twice = authenticated();
    twice.clear_auth();
    twice.clear_auth();

    assert_eq!(once, twice);
    assert!(once.user.is_none());
    assert!(!once.is_authenticated);
    assert!(once.csrf_token.is_none());
    assert!(!once.loading);
}

// =============================================================
// Partial updates
// =============================================================

#[test]
fn set_auth_state_merges_only_given_fields() {
    let mut state = authenticated();
    state.set_auth_state(AuthPatch {
        csrf_token: Some(Some("csrf-2".to_owned())),
        ..AuthPatch::default()
    });

    assert_eq!(state.csrf_token.as_deref(), Some("csrf-2"));
    assert_eq!(state.user, Some(user()));
    assert!(state.is_authenticated);
}

#[test]
fn set_auth_state_can_clear_fields_explicitly() {
    let mut state = authenticated();
    state.set_auth_state(AuthPatch {
        user: Some(None),
        is_authenticated: Some(false),
        csrf_token: Some(None),
    });

    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(state.csrf_token.is_none());
}

#[test]
fn update_user_replaces_user_only() {
    let mut state = authenticated();
    let mut renamed = user();
    renamed.email = "new@example.com".to_owned();
    state.update_user(renamed.clone());

    assert_eq!(state.user, Some(renamed));
    assert!(state.is_authenticated);
    assert_eq!(state.csrf_token.as_deref(), Some("csrf"));
}

// =============================================================
// Validation outcomes
// =============================================================

fn validation_error(kind: ErrorKind, status: Option<u16>) -> ApiError {
    ApiError {
        kind,
        message: "validation failed".to_owned(),
        status,
        code: None,
        body: None,
    }
}

#[test]
fn validation_success_refreshes_the_user() {
    let mut state = authenticated();
    let mut fresh = user();
    fresh.name = "John Q. Doe".to_owned();

    let effect = state.apply_validation(Ok(fresh.clone()));

    assert_eq!(effect, ValidationEffect::Refreshed);
    assert_eq!(state.user, Some(fresh));
    assert!(state.is_authenticated);
}

#[test]
fn validation_auth_rejection_clears_the_session() {
    let mut state = authenticated();

    let effect = state.apply_validation(Err(validation_error(ErrorKind::Auth, Some(401))));

    assert_eq!(effect, ValidationEffect::Dropped);
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(state.csrf_token.is_none());
}

#[test]
fn validation_transient_failure_leaves_the_session_untouched() {
    let mut state = authenticated();
    let before = state.clone();

    let network = state.apply_validation(Err(validation_error(ErrorKind::Network, None)));
    let server = state.apply_validation(Err(validation_error(ErrorKind::Server, Some(500))));

    assert_eq!(network, ValidationEffect::Kept);
    assert_eq!(server, ValidationEffect::Kept);
    assert_eq!(state, before);
}

// =============================================================
// Snapshot round trip
// =============================================================

#[test]
fn snapshot_restore_round_trip_preserves_the_durable_subset() {
    let mut state = authenticated();
    state.error = Some("transient".to_owned());

    let restored = SessionState::restore(state.snapshot());

    assert_eq!(restored.snapshot(), state.snapshot());
    // Loading and error are never persisted.
    assert!(!restored.loading);
    assert!(restored.error.is_none());
}

#[test]
fn snapshot_of_empty_session_restores_empty() {
    let mut state = SessionState::default();
    state.clear_auth();

    let restored = SessionState::restore(state.snapshot());
    assert_eq!(restored, state);
}
