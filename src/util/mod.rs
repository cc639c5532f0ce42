//! Small cross-cutting helpers: storage, navigation, clock, form schemas.

pub mod navigate;
pub mod persist;
pub mod time;
pub mod validate;
