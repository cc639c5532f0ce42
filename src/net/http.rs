//! HTTP transport wrapper: the single point of contact with the account API.
//!
//! `ApiClient` owns the bearer and CSRF tokens, unwraps the response
//! envelope, and performs one-shot 401 recovery (refresh then a single
//! replay). It is generic over [`Transport`] so the protocol logic runs in
//! native tests against a scripted transport; the browser implementation
//! lives in [`GlooTransport`] behind the `hydrate` feature.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;

use serde_json::Value;

use crate::net::error::ApiError;
use crate::net::types::ApiEnvelope;
use crate::util::time::now_ms;

/// HTTP verbs used by the API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    /// State-changing verbs carry the CSRF token.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Verb::Get)
    }
}

/// A fully prepared outgoing request handed to the transport.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub verb: Verb,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw transport result: HTTP status plus the parsed JSON body
/// (`Value::Null` when the body is empty or not JSON).
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Seam between the protocol logic and the fetch machinery.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String>;
}

/// API client wrapping a [`Transport`] with base URL, default headers, CSRF
/// discipline, and 401 recovery. Tokens live here and nowhere else; neither
/// survives a reload.
pub struct ApiClient<T: Transport> {
    transport: T,
    base_url: String,
    bearer: RefCell<Option<String>>,
    csrf: RefCell<Option<String>>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            bearer: RefCell::new(None),
            csrf: RefCell::new(None),
        }
    }

    pub fn transport_ref(&self) -> &T {
        &self.transport
    }

    pub fn set_bearer(&self, token: impl Into<String>) {
        self.bearer.replace(Some(token.into()));
    }

    pub fn set_csrf(&self, token: impl Into<String>) {
        self.csrf.replace(Some(token.into()));
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.bearer.borrow().clone()
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.csrf.borrow().clone()
    }

    /// Drop both default-header tokens. The server-side refresh cookie is
    /// untouched; only `POST /auth/logout` invalidates it.
    pub fn clear_tokens(&self) {
        self.bearer.replace(None);
        self.csrf.replace(None);
    }

    /// Perform a call and unwrap the envelope into its `data` payload.
    ///
    /// State-changing verbs fetch a CSRF token first when none is cached. A
    /// 401 on a non-auth endpoint triggers exactly one token refresh and one
    /// replay; an exhausted refresh clears the tokens, forces navigation to
    /// the login entry point, and surfaces the original error.
    ///
    /// # Errors
    ///
    /// Every failure mode (transport, HTTP status, `success:false`) comes
    /// back as a single [`ApiError`] shape.
    pub async fn request(&self, verb: Verb, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        if verb.is_mutating() {
            self.ensure_csrf().await?;
        }

        let resp = self.send_once(verb, path, body.clone()).await?;
        if resp.status == 401 && refreshable(path) {
            if self.refresh_access_token().await.is_ok() {
                let replay = self.send_once(verb, path, body).await?;
                return interpret_response(&replay);
            }
            self.clear_tokens();
            crate::util::navigate::force_login();
        }
        interpret_response(&resp)
    }

    /// One wire round trip: build headers, send, mirror any rotated CSRF
    /// token from the response body.
    async fn send_once(&self, verb: Verb, path: &str, body: Option<Value>) -> Result<HttpResponse, ApiError> {
        let req = HttpRequest {
            verb,
            url: self.build_url(verb, path),
            headers: self.build_headers(verb),
            body,
        };
        let resp = self.transport.send(req).await.map_err(ApiError::network)?;
        if let Some(token) = csrf_in_body(&resp.body) {
            self.csrf.replace(Some(token.to_owned()));
        }
        Ok(resp)
    }

    /// Fetch a CSRF token if none is cached yet.
    async fn ensure_csrf(&self) -> Result<(), ApiError> {
        if self.csrf.borrow().is_some() {
            return Ok(());
        }
        let resp = self.send_once(Verb::Get, "/auth/csrf-token", None).await?;
        let data = interpret_response(&resp)?;
        if let Some(token) = data.get("csrfToken").and_then(Value::as_str) {
            self.csrf.replace(Some(token.to_owned()));
        }
        Ok(())
    }

    /// Mint a new bearer token off the refresh cookie and install it.
    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let resp = self.send_once(Verb::Post, "/auth/refresh", None).await?;
        let data = interpret_response(&resp)?;
        if let Some(token) = data.get("accessToken").and_then(Value::as_str) {
            self.set_bearer(token);
        }
        Ok(())
    }

    fn build_url(&self, verb: Verb, path: &str) -> String {
        let mut url = format!("{}{path}", self.base_url);
        if verb == Verb::Get {
            // Monotonic timestamp defeats intermediate response caching.
            let sep = if url.contains('?') { '&' } else { '?' };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let ts = now_ms() as u64;
            url.push_str(&format!("{sep}_ts={ts}"));
        }
        url
    }

    fn build_headers(&self, verb: Verb) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("Accept".to_owned(), "application/json".to_owned()),
        ];
        if let Some(token) = self.bearer.borrow().as_ref() {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        if verb.is_mutating() {
            if let Some(token) = self.csrf.borrow().as_ref() {
                headers.push(("X-CSRF-Token".to_owned(), token.clone()));
            }
        }
        headers
    }
}

/// Auth endpoints never go through the refresh-and-replay path; everything
/// else gets exactly one recovery attempt.
fn refreshable(path: &str) -> bool {
    !matches!(path, "/auth/login" | "/auth/refresh" | "/auth/logout" | "/auth/csrf-token")
}

/// Unwrap a raw response into its envelope `data`, or a uniform error.
pub fn interpret_response(resp: &HttpResponse) -> Result<Value, ApiError> {
    let envelope = ApiEnvelope::from_body(&resp.body);
    if resp.status >= 400 {
        return Err(ApiError::from_response(resp.status, &envelope, &resp.body));
    }
    if !envelope.success {
        return Err(ApiError::from_envelope(&envelope, &resp.body));
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}

/// Servers rotate the CSRF token by echoing a fresh one in response data.
fn csrf_in_body(body: &Value) -> Option<&str> {
    body.get("data")?.get("csrfToken")?.as_str()
}

/// Browser transport: `gloo-net` fetch with cookies included on every call.
#[cfg(feature = "hydrate")]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
impl Transport for GlooTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match req.verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&req.url)
            .method(method)
            .credentials(web_sys::RequestCredentials::Include);
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let request = match &req.body {
            Some(body) => builder.json(body).map_err(|e| e.to_string())?,
            None => builder.build().map_err(|e| e.to_string())?,
        };

        let resp = request.send().await.map_err(|e| e.to_string())?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(HttpResponse { status, body })
    }
}
