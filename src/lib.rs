//! Greeting API: a small REST service template with a swappable greeter and lazily wired
//! PostgreSQL sessions.

pub mod app;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod greeting;
pub mod handlers;
pub mod overrides;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use config::{AppSettings, DbSettings, EnvSource, SettingsStore};
pub use db::{ensure_database_exists, ResourceFactory, ResourceHandle, Session, SessionFactory};
pub use error::{AppError, ConfigError};
pub use greeting::{Greeter, GreeterResolver};
pub use overrides::{DependencyKey, OverrideGuard, Overrides, Provider};
pub use response::GreetingResponse;
pub use state::AppState;
pub use telemetry::init_tracing;
