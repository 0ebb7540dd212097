//! Settings loaded from the process environment and an optional `.env` file.

pub mod app;
pub mod db;
pub mod source;
pub mod store;

pub use app::*;
pub use db::*;
pub use source::*;
pub use store::*;
