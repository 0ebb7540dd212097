//! Database access: the lazily built resource factory, sessions, and provisioning.

pub mod bootstrap;
pub mod factory;
pub mod session;

pub use bootstrap::ensure_database_exists;
pub use factory::{ResourceFactory, ResourceHandle};
pub use session::{run_scoped, run_transaction, Session, SessionFactory, SessionFuture};
