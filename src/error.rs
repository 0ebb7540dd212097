//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("env file: {0}")]
    EnvFile(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("resource initialization: {0}")]
    ResourceInitialization(String),
    #[error("{dependency} is unavailable: {hint}")]
    DependencyUnavailable {
        dependency: &'static str,
        hint: &'static str,
    },
    #[error("database: {0}")]
    Session(#[from] sqlx::Error),
    #[error("session {0} is already closed")]
    SessionClosed(uuid::Uuid),
    #[error("override for {key} expects a {expected} provider")]
    OverrideMismatch {
        key: &'static str,
        expected: &'static str,
    },
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Stable machine-readable code used in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::ResourceInitialization(_) => "resource_unavailable",
            AppError::DependencyUnavailable { .. } => "dependency_unavailable",
            AppError::Session(_) | AppError::SessionClosed(_) => "database_error",
            AppError::OverrideMismatch { .. } => "override_mismatch",
        }
    }

    /// Message sent to clients. Only the remediation hint for a missing dependency is exposed;
    /// everything else stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DependencyUnavailable { .. } => self.to_string(),
            AppError::ResourceInitialization(_) => "service unavailable".to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ResourceInitialization(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(code = self.code(), error = %self, "request failed");
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.public_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn session_errors_hide_driver_details() {
        let (status, body) = body_of(AppError::Session(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "database_error");
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn config_errors_hide_offending_value() {
        let err = AppError::Config(ConfigError::Invalid {
            key: "USE_MOCK_GREETING",
            value: "sometimes".into(),
            reason: "expected a boolean".into(),
        });
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "config_error");
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn initialization_and_override_errors_are_generic() {
        let (status, body) = body_of(AppError::ResourceInitialization("invalid database url: secret".into())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["message"], "service unavailable");

        let (_, body) = body_of(AppError::OverrideMismatch {
            key: "greeter",
            expected: "greeter",
        })
        .await;
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[test]
    fn dependency_unavailable_message_carries_hint() {
        let err = AppError::DependencyUnavailable {
            dependency: "mock greeting service",
            hint: "enable it",
        };
        assert_eq!(err.to_string(), "mock greeting service is unavailable: enable it");
        assert_eq!(err.code(), "dependency_unavailable");
        assert_eq!(err.public_message(), "mock greeting service is unavailable: enable it");
    }
}
