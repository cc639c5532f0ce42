//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State lives in plain structs provided as `RwSignal` contexts so
//! components depend on small focused models and the mutation logic stays
//! natively testable.

pub mod session;
