//! Greeting routes, unversioned and under /v1.

use crate::handlers::greetings::{greet, hello_world};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET / and GET /greetings/:name
pub fn greeting_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .route("/greetings/:name", get(greet))
        .with_state(state)
}

/// Versioned greeting routes; mount under `/v1`.
pub fn versioned_greeting_routes(state: AppState) -> Router {
    Router::new()
        .route("/greetings/:name", get(greet))
        .with_state(state)
}
