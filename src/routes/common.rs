//! Common routes: health, readiness, version.

use crate::error::AppError;
use crate::response::VersionBody;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    let check = state
        .scoped_session(|session| {
            Box::pin(async move {
                sqlx::query("SELECT 1").execute(session.connection().await?).await?;
                Ok::<_, AppError>(())
            })
        })
        .await;
    if let Err(e) = check {
        tracing::warn!(error = %e, "readiness check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: Some("unavailable"),
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: Some("ok"),
    }))
}

async fn version(State(state): State<AppState>) -> Result<Json<VersionBody>, AppError> {
    let settings = state.settings.app()?;
    Ok(Json(VersionBody {
        name: settings.app_name.clone(),
        version: settings.app_version.clone(),
    }))
}

/// GET /health, /ready, /version. Health has no dependencies; readiness probes the database.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
