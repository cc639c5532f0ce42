//! Scripted transport for native protocol tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::net::http::{HttpRequest, HttpResponse, Transport, Verb};

/// Transport that serves queued responses per `(verb, path)` and logs every
/// outgoing request so tests can assert call counts, ordering, and headers.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<HashMap<String, VecDeque<Result<HttpResponse, String>>>>,
    log: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call to `verb path` (query ignored).
    pub fn on(&self, verb: Verb, path: &str, resp: Result<HttpResponse, String>) {
        self.responses
            .borrow_mut()
            .entry(key(verb, path))
            .or_default()
            .push_back(resp);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.borrow().clone()
    }

    pub fn count(&self, verb: Verb, path: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.verb == verb && path_of(&r.url) == path)
            .count()
    }
}

impl Transport for MockTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        let lookup = key(req.verb, path_of(&req.url));
        self.log.borrow_mut().push(req);
        self.responses
            .borrow_mut()
            .get_mut(&lookup)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(format!("unexpected request: {lookup}")))
    }
}

fn key(verb: Verb, path: &str) -> String {
    format!("{} {path}", verb.as_str())
}

/// Strip the `/api` prefix and any query string off a request URL.
pub fn path_of(url: &str) -> &str {
    let path = url.strip_prefix("/api").unwrap_or(url);
    path.split('?').next().unwrap_or(path)
}

/// A 200 envelope response around `data`.
pub fn ok(data: Value) -> Result<HttpResponse, String> {
    Ok(HttpResponse {
        status: 200,
        body: serde_json::json!({"success": true, "message": "ok", "data": data}),
    })
}

/// A failed envelope response with the given HTTP status.
pub fn err_status(status: u16, message: &str) -> Result<HttpResponse, String> {
    Ok(HttpResponse {
        status,
        body: serde_json::json!({"success": false, "message": message}),
    })
}

/// A user record matching the server's fixtures.
pub fn user_json() -> Value {
    serde_json::json!({
        "id": 1,
        "name": "John Doe",
        "email": "john.doe@example.com",
        "phone": "+1 555 0100",
        "address": "1 Main St",
        "company": "Acme Corp",
        "isActive": true,
        "balance": "$1,234.56",
        "age": 34,
        "eyeColor": "green",
        "picture": "https://example.com/avatar.png"
    })
}
