//! Shared view components.

pub mod inactive_notice;
pub mod nav_bar;
pub mod route_guard;
