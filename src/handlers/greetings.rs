//! Greeting handlers. The name is taken verbatim from the path.

use crate::extractors::{GreetingName, ResolvedGreeter};
use crate::response::GreetingResponse;
use axum::Json;

/// GET /: greets the literal name "World".
pub async fn hello_world(ResolvedGreeter(greeter): ResolvedGreeter) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: greeter.generate_greeting("World"),
    })
}

/// GET /greetings/:name and GET /v1/greetings/:name
pub async fn greet(
    ResolvedGreeter(greeter): ResolvedGreeter,
    GreetingName(name): GreetingName,
) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: greeter.generate_greeting(&name),
    })
}
