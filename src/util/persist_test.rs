use super::*;
use crate::net::types::User;

fn snapshot() -> SessionSnapshot {
    SessionSnapshot {
        user: Some(User {
            id: 7,
            name: "Jane Roe".to_owned(),
            email: "jane@example.com".to_owned(),
            phone: None,
            address: None,
            company: Some("Roe LLC".to_owned()),
            is_active: false,
            balance: Some("$0.00".to_owned()),
            age: Some(41),
            eye_color: None,
            picture: None,
        }),
        is_authenticated: true,
        csrf_token: Some("csrf-7".to_owned()),
    }
}

#[test]
fn encode_decode_round_trip() {
    let original = snapshot();
    let raw = encode(&original).expect("encode");
    assert_eq!(decode(&raw), Some(original));
}

#[test]
fn encode_uses_the_documented_key_names() {
    let raw = encode(&snapshot()).expect("encode");
    assert!(raw.contains("\"isAuthenticated\":true"));
    assert!(raw.contains("\"csrfToken\":\"csrf-7\""));
    assert!(raw.contains("\"isActive\":false"));
}

#[test]
fn decode_rejects_malformed_input() {
    assert_eq!(decode("not json"), None);
    assert_eq!(decode("{}"), None);
    assert_eq!(decode("{\"user\":null}"), None);
}

#[test]
fn decode_accepts_empty_session() {
    let raw = "{\"user\":null,\"isAuthenticated\":false,\"csrfToken\":null}";
    let decoded = decode(raw).expect("decode");
    assert!(decoded.user.is_none());
    assert!(!decoded.is_authenticated);
    assert!(decoded.csrf_token.is_none());
}

#[test]
fn load_returns_none_outside_the_browser() {
    assert_eq!(load(), None);
}
