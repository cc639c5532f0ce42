//! Durable-storage boundary for the session snapshot.
//!
//! One localStorage key holds the serialized `{user, isAuthenticated,
//! csrfToken}` subset. Serialization is explicit and invoked at defined
//! lifecycle points: load once at startup, save after every committed
//! mutation, clear on logout. Requires a browser environment for the I/O;
//! the JSON codec itself is plain and natively testable.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use crate::state::session::SessionSnapshot;

#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "account_client_session";

/// Serialize a snapshot for storage.
pub fn encode(snapshot: &SessionSnapshot) -> Option<String> {
    serde_json::to_string(snapshot).ok()
}

/// Decode a stored snapshot; anything malformed reads as absent.
pub fn decode(raw: &str) -> Option<SessionSnapshot> {
    serde_json::from_str(raw).ok()
}

/// Load the persisted session, if any.
pub fn load() -> Option<SessionSnapshot> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window()?.local_storage().ok()??;
        let raw = storage.get_item(STORAGE_KEY).ok()??;
        decode(&raw)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Persist the durable subset.
pub fn save(snapshot: &SessionSnapshot) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(raw) = encode(snapshot) {
            if let Ok(Some(storage)) = web_sys::window().map_or(Ok(None), |w| w.local_storage()) {
                let _ = storage.set_item(STORAGE_KEY, &raw);
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = snapshot;
    }
}

/// Remove the stored session entirely.
pub fn clear() {
    #[cfg(feature = "hydrate")]
    {
        if let Ok(Some(storage)) = web_sys::window().map_or(Ok(None), |w| w.local_storage()) {
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
}
