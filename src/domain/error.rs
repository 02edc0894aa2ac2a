use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::column::ColumnKind;
use crate::domain::validation::Violation;

#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed: {}", format_violations(.0))]
    Validation(Vec<Violation>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("board has no {0} column")]
    MissingColumn(ColumnKind),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for KanbanError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            KanbanError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            KanbanError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            KanbanError::Validation(violations) => {
                let body = json!({
                    "error": "Validation failed",
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "violations": violations,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            KanbanError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            KanbanError::MissingColumn(_) => {
                tracing::error!("Board integrity error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            KanbanError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            KanbanError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            KanbanError::Migration(err) => {
                tracing::error!("Migration error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            KanbanError::Serialization(err) => {
                tracing::error!("Serialization error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
