//! HTTP handlers for the greeting endpoints.

pub mod greetings;
pub use greetings::*;
