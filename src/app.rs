//! Router assembly.

use crate::routes::{common_routes_with_ready, greeting_routes, versioned_greeting_routes};
use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application: common routes, greetings, and the `/v1` greeting routes.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(greeting_routes(state.clone()))
        .nest("/v1", versioned_greeting_routes(state))
        .layer(TraceLayer::new_for_http())
}
