//! Explicit response cache keyed by logical query identity.
//!
//! Each entry stores the fetched value, its fetch time, and an in-flight
//! flag for deduplication. Staleness windows and retry policy are per-key
//! data; revalidation on window refocus / network reconnect is an explicit
//! event subscription, registered once at startup.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::cell::RefCell;
use std::collections::HashMap;

use futures::channel::oneshot;
use serde_json::Value;

use crate::net::error::{ApiError, ErrorKind};

/// Logical identity of a cached read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Validate,
    CurrentUser,
    Balance,
    Summary,
}

impl QueryKey {
    /// Staleness window in milliseconds.
    pub fn stale_after_ms(self) -> f64 {
        match self {
            // Short window: session validity should be re-checked often.
            QueryKey::Validate => 5.0 * 60_000.0,
            QueryKey::CurrentUser => 15.0 * 60_000.0,
            QueryKey::Balance => 60_000.0,
            QueryKey::Summary => 5.0 * 60_000.0,
        }
    }

    /// Whether a failed fetch may be retried automatically. Validation is
    /// single-attempt; 401/403 is terminal everywhere, never transient.
    pub fn may_retry(self, error: &ApiError) -> bool {
        if error.kind == ErrorKind::Auth {
            return false;
        }
        !matches!(self, QueryKey::Validate)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CacheEntry {
    value: Option<Value>,
    fetched_at: f64,
    in_flight: bool,
}

/// Process-wide cache of query results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value if it is within its staleness window.
    pub fn fresh(&self, key: QueryKey, now_ms: f64) -> Option<&Value> {
        let entry = self.entries.get(&key)?;
        if now_ms - entry.fetched_at <= key.stale_after_ms() {
            entry.value.as_ref()
        } else {
            None
        }
    }

    /// The cached value regardless of staleness.
    pub fn get(&self, key: QueryKey) -> Option<&Value> {
        self.entries.get(&key)?.value.as_ref()
    }

    pub fn insert(&mut self, key: QueryKey, value: Value, now_ms: f64) {
        let entry = self.entries.entry(key).or_insert(CacheEntry {
            value: None,
            fetched_at: f64::NEG_INFINITY,
            in_flight: false,
        });
        entry.value = Some(value);
        entry.fetched_at = now_ms;
    }

    /// Claim the fetch for `key`. Returns false when another fetch is
    /// already in flight (the caller should serve the cached value instead).
    pub fn begin(&mut self, key: QueryKey) -> bool {
        let entry = self.entries.entry(key).or_insert(CacheEntry {
            value: None,
            fetched_at: f64::NEG_INFINITY,
            in_flight: false,
        });
        if entry.in_flight {
            return false;
        }
        entry.in_flight = true;
        true
    }

    pub fn finish(&mut self, key: QueryKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.in_flight = false;
        }
    }

    /// Drop one entry, forcing the next read to hit the network.
    pub fn invalidate(&mut self, key: QueryKey) {
        self.entries.remove(&key);
    }

    /// Drop everything. Used on logout and on a failed refresh cascade.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keep values but age them out, so reads revalidate silently while the
    /// stale value stays on screen. Refocus/reconnect trigger this.
    pub fn mark_all_stale(&mut self) {
        for entry in self.entries.values_mut() {
            entry.fetched_at = f64::NEG_INFINITY;
        }
    }
}

type SharedOutcome = Result<Option<Value>, ApiError>;

thread_local! {
    static WAITERS: RefCell<HashMap<QueryKey, Vec<oneshot::Sender<SharedOutcome>>>> =
        RefCell::new(HashMap::new());
}

/// Releases the in-flight claim (and strands no waiters) even when the
/// owning fetch future is dropped mid-flight.
struct FetchGuard {
    cache: leptos::prelude::RwSignal<QueryCache>,
    key: QueryKey,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        use leptos::prelude::Update;

        let _ = self.cache.try_update(|c| c.finish(self.key));
        WAITERS.with(|w| w.borrow_mut().remove(&self.key));
    }
}

/// Run a cached read: serve a fresh value, join a fetch already in flight
/// for the same key, and apply the per-key retry policy (at most one
/// automatic retry).
pub async fn fetch_cached<T, F, Fut>(
    cache: leptos::prelude::RwSignal<QueryCache>,
    key: QueryKey,
    fetch: F,
) -> Result<Option<T>, ApiError>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    use leptos::prelude::{Update, WithUntracked};

    use crate::util::time::now_ms;

    if let Some(value) = cache.with_untracked(|c| c.fresh(key, now_ms()).cloned()) {
        return Ok(serde_json::from_value(value).ok());
    }
    if !cache.try_update(|c| c.begin(key)).unwrap_or(false) {
        // Another reader owns the fetch; wait for its result instead of
        // racing it or serving a possibly absent stale value.
        let (tx, rx) = oneshot::channel();
        WAITERS.with(|w| w.borrow_mut().entry(key).or_default().push(tx));
        return match rx.await {
            Ok(Ok(Some(value))) => Ok(serde_json::from_value(value).ok()),
            Ok(Ok(None)) => Ok(None),
            Ok(Err(err)) => Err(err),
            // The owning fetch was dropped mid-flight; fall back to the
            // stale value, if any.
            Err(oneshot::Canceled) => Ok(cache
                .with_untracked(|c| c.get(key).cloned())
                .and_then(|v| serde_json::from_value(v).ok())),
        };
    }

    let guard = FetchGuard { cache, key };
    let mut result = fetch().await;
    if let Err(err) = &result {
        if key.may_retry(err) {
            result = fetch().await;
        }
    }

    let (outcome, shared) = match result {
        Ok(value) => {
            let json = serde_json::to_value(&value).ok();
            if let Some(json) = &json {
                cache.update(|c| c.insert(key, json.clone(), now_ms()));
            }
            (Ok(Some(value)), Ok(json))
        }
        Err(err) => (Err(err.clone()), Err(err)),
    };
    for tx in WAITERS.with(|w| w.borrow_mut().remove(&key)).unwrap_or_default() {
        let _ = tx.send(shared.clone());
    }
    drop(guard);
    outcome
}

/// Subscribe `on_revalidate` to window refocus and network reconnect.
#[cfg(feature = "hydrate")]
pub fn register_revalidation(on_revalidate: impl Fn() + 'static) {
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = wasm_bindgen::closure::Closure::<dyn Fn()>::new(on_revalidate);
    let callback = closure.as_ref().unchecked_ref();
    let _ = window.add_event_listener_with_callback("focus", callback);
    let _ = window.add_event_listener_with_callback("online", callback);
    // Listeners live for the whole page lifetime.
    closure.forget();
}
