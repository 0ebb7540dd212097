//! Route tables. Each function returns a router with its state already applied.

pub mod common;
pub mod greetings;

pub use common::common_routes_with_ready;
pub use greetings::{greeting_routes, versioned_greeting_routes};
