//! Greeting API server.
//!
//! Run from repo root: `cargo run -p greeting-server`
//! Without the development greeter: `cargo run -p greeting-server --no-default-features`

use greeting_api::{create_app, ensure_database_exists, init_tracing, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::from_env()?;
    let settings = state.settings.app()?;
    let db_settings = state.settings.db()?;
    tracing::info!(
        name = %settings.app_name,
        version = %settings.app_version,
        mock_greeting = settings.use_mock_greeting,
        "starting"
    );

    // Fail at startup rather than on the first request when the greeter cannot be resolved.
    let greeter = state.greeter()?;
    tracing::info!(greeter = greeter.kind(), "greeter selected");

    if db_settings.create_database {
        ensure_database_exists(&db_settings.connect_options()?).await?;
    }

    let app = create_app(state.clone());
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.reset().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
