use futures::executor::block_on;

use super::*;
use crate::net::error::ErrorKind;
use crate::net::testing::{MockTransport, err_status, ok, user_json};

fn client() -> ApiClient<MockTransport> {
    ApiClient::new(MockTransport::new(), "/api")
}

// =============================================================
// login
// =============================================================

#[test]
fn login_issues_one_csrf_fetch_then_one_login_call() {
    let client = client();
    client
        .transport_ref()
        .on(Verb::Get, "/auth/csrf-token", ok(serde_json::json!({"csrfToken": "csrf"})));
    client.transport_ref().on(
        Verb::Post,
        "/auth/login",
        ok(serde_json::json!({"user": user_json(), "accessToken": "tok", "csrfToken": "csrf"})),
    );

    let data = block_on(login(&client, "john.doe@example.com", "password123")).expect("login");

    assert_eq!(data.user.email, "john.doe@example.com");
    assert_eq!(data.csrf_token.as_deref(), Some("csrf"));
    assert_eq!(client.bearer_token().as_deref(), Some("tok"));
    assert_eq!(client.csrf_token().as_deref(), Some("csrf"));
    assert_eq!(client.transport_ref().count(Verb::Get, "/auth/csrf-token"), 1);
    assert_eq!(client.transport_ref().count(Verb::Post, "/auth/login"), 1);

    // Credentials travel in the documented body shape.
    let requests = client.transport_ref().requests();
    let body = requests[1].body.as_ref().expect("login body");
    assert_eq!(body["email"], "john.doe@example.com");
    assert_eq!(body["password"], "password123");
}

#[test]
fn login_failure_leaves_no_bearer_token() {
    let client = client();
    client
        .transport_ref()
        .on(Verb::Get, "/auth/csrf-token", ok(serde_json::json!({"csrfToken": "csrf"})));
    client
        .transport_ref()
        .on(Verb::Post, "/auth/login", err_status(401, "Invalid credentials"));

    let err = block_on(login(&client, "john.doe@example.com", "wrong")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Auth);
    assert!(client.bearer_token().is_none());
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_clears_tokens_even_when_remote_call_fails() {
    let client = client();
    client.set_bearer("tok");
    client.set_csrf("csrf");
    client
        .transport_ref()
        .on(Verb::Post, "/auth/logout", Err("connection refused".to_owned()));

    block_on(logout(&client));

    assert!(client.bearer_token().is_none());
    assert!(client.csrf_token().is_none());
}

#[test]
fn logout_clears_tokens_on_success_too() {
    let client = client();
    client.set_bearer("tok");
    client.set_csrf("csrf");
    client.transport_ref().on(Verb::Post, "/auth/logout", ok(Value::Null));

    block_on(logout(&client));

    assert!(client.bearer_token().is_none());
    assert!(client.csrf_token().is_none());
}

// =============================================================
// validate / refresh
// =============================================================

#[test]
fn validate_token_returns_the_fresh_user() {
    let client = client();
    client
        .transport_ref()
        .on(Verb::Get, "/auth/validate", ok(serde_json::json!({"user": user_json()})));

    let user = block_on(validate_token(&client)).expect("validate");
    assert_eq!(user.id, 1);
    assert!(user.is_active);
}

#[test]
fn refresh_session_installs_token_and_uses_inline_user() {
    let client = client();
    client.set_csrf("csrf");
    client.transport_ref().on(
        Verb::Post,
        "/auth/refresh",
        ok(serde_json::json!({"accessToken": "tok-2", "user": user_json()})),
    );

    let user = block_on(refresh_session(&client)).expect("refresh");
    assert_eq!(user.name, "John Doe");
    assert_eq!(client.bearer_token().as_deref(), Some("tok-2"));
    assert_eq!(client.transport_ref().count(Verb::Get, "/user/profile"), 0);
}

#[test]
fn refresh_session_falls_back_to_profile_fetch() {
    let client = client();
    client.set_csrf("csrf");
    client
        .transport_ref()
        .on(Verb::Post, "/auth/refresh", ok(serde_json::json!({"accessToken": "tok-2"})));
    client
        .transport_ref()
        .on(Verb::Get, "/user/profile", ok(serde_json::json!({"user": user_json()})));

    let user = block_on(refresh_session(&client)).expect("refresh");
    assert_eq!(user.email, "john.doe@example.com");
    assert_eq!(client.transport_ref().count(Verb::Get, "/user/profile"), 1);
}

// =============================================================
// account operations
// =============================================================

#[test]
fn change_password_posts_the_documented_body() {
    let client = client();
    client.set_csrf("csrf");
    client
        .transport_ref()
        .on(Verb::Post, "/auth/change-password", ok(Value::Null));

    block_on(change_password(&client, "old-pass", "new-pass", "new-pass")).expect("change");

    let requests = client.transport_ref().requests();
    let body = requests[0].body.as_ref().expect("body");
    assert_eq!(body["currentPassword"], "old-pass");
    assert_eq!(body["newPassword"], "new-pass");
    assert_eq!(body["confirmPassword"], "new-pass");
}

#[test]
fn update_profile_sends_only_changed_fields() {
    let client = client();
    client.set_csrf("csrf");
    client
        .transport_ref()
        .on(Verb::Put, "/user/profile", ok(serde_json::json!({"user": user_json()})));

    let update = ProfileUpdate {
        email: Some("new@example.com".to_owned()),
        ..ProfileUpdate::default()
    };
    let user = block_on(update_profile(&client, &update)).expect("update");
    assert_eq!(user.id, 1);

    let requests = client.transport_ref().requests();
    let body = requests[0].body.as_ref().expect("body");
    assert_eq!(body["email"], "new@example.com");
    assert!(body.get("name").is_none());
    assert!(body.get("phone").is_none());
}

#[test]
fn fetch_balance_decodes_the_payload() {
    let client = client();
    client.transport_ref().on(
        Verb::Get,
        "/user/balance",
        ok(serde_json::json!({
            "balance": "$1,234.56",
            "numericBalance": 1234.56,
            "currency": "USD",
            "lastUpdated": "2026-08-27T10:00:00Z"
        })),
    );

    let balance = block_on(fetch_balance(&client)).expect("balance");
    assert_eq!(balance.currency, "USD");
    assert!((balance.numeric_balance - 1234.56).abs() < f64::EPSILON);
}

#[test]
fn fetch_summary_unwraps_the_nested_record() {
    let client = client();
    client.transport_ref().on(
        Verb::Get,
        "/user/summary",
        ok(serde_json::json!({"summary": {
            "accountId": "ACC-1",
            "displayName": "John Doe",
            "email": "john.doe@example.com",
            "balance": "$1,234.56",
            "company": "Acme Corp",
            "accountStatus": "active",
            "profileCompleteness": 80,
            "lastActivity": "2026-08-26T09:00:00Z",
            "securityLevel": "standard"
        }})),
    );

    let summary = block_on(fetch_summary(&client)).expect("summary");
    assert_eq!(summary.account_id, "ACC-1");
    assert_eq!(summary.profile_completeness, 80);
}

#[test]
fn delete_account_sends_password_and_clears_tokens() {
    let client = client();
    client.set_bearer("tok");
    client.set_csrf("csrf");
    client.transport_ref().on(Verb::Delete, "/user/account", ok(Value::Null));

    block_on(delete_account(&client, "password123")).expect("delete");

    let requests = client.transport_ref().requests();
    assert_eq!(requests[0].verb, Verb::Delete);
    assert_eq!(requests[0].body.as_ref().expect("body")["password"], "password123");
    assert_eq!(requests[0].header("X-CSRF-Token"), Some("csrf"));
    assert!(client.bearer_token().is_none());
}

#[test]
fn malformed_payload_is_a_decode_error() {
    let client = client();
    client
        .transport_ref()
        .on(Verb::Get, "/auth/validate", ok(serde_json::json!({"user": {"id": "not-a-number"}})));

    let err = block_on(validate_token(&client)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Server);
    assert!(err.message.contains("malformed response payload"));
}
