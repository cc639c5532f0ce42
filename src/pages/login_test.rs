use super::*;

fn failure(kind: ErrorKind, message: &str, status: Option<u16>) -> ApiError {
    ApiError {
        kind,
        message: message.to_owned(),
        status,
        code: None,
        body: None,
    }
}

#[test]
fn invalid_credentials_flag_both_fields_inline() {
    let (fields, form) =
        failure_presentation(&failure(ErrorKind::Auth, "Invalid credentials", Some(401)));

    assert_eq!(fields.email.as_deref(), Some("Invalid email or password"));
    assert_eq!(fields.password.as_deref(), Some("Invalid email or password"));
    assert!(form.is_none());
}

#[test]
fn transport_failures_surface_on_the_form_level_line() {
    let (fields, form) =
        failure_presentation(&failure(ErrorKind::Network, "connection refused", None));

    assert!(fields.is_empty());
    assert_eq!(form.as_deref(), Some("connection refused"));
}

#[test]
fn server_failures_carry_their_status() {
    let (fields, form) = failure_presentation(&failure(ErrorKind::Server, "boom", Some(500)));

    assert!(fields.is_empty());
    assert_eq!(form.as_deref(), Some("boom (status 500)"));
}
