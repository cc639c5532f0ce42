//! Networking: transport wrapper, typed operations, and the query cache.
//!
//! DESIGN
//! ======
//! `http` owns headers, CSRF, and 401 recovery; `ops` maps endpoints to
//! typed outcomes; `cache` holds read results keyed by logical query
//! identity; `browser` wires it all to the reactive stores in the browser.

#[cfg(feature = "hydrate")]
pub mod browser;
pub mod cache;
pub mod error;
pub mod http;
pub mod ops;
#[cfg(test)]
pub mod testing;
pub mod types;
