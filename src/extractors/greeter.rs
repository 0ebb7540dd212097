//! Resolve the greeter for a request from the application context.

use crate::error::AppError;
use crate::greeting::Greeter;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Greeter selected for this request: the installed override, else the resolver's cached choice.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedGreeter(pub Greeter);

#[async_trait]
impl FromRequestParts<AppState> for ResolvedGreeter {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.greeter().map(ResolvedGreeter)
    }
}
