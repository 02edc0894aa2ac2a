use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::api::handlers::sse::SseEvent;
use crate::config::Config;
use crate::domain::KanbanError;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Option<SqlitePool>,
    pub sse_tx: broadcast::Sender<String>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db: Option<SqlitePool>,
        sse_tx: broadcast::Sender<String>,
        config: Arc<Config>,
    ) -> Self {
        Self { db, sse_tx, config }
    }

    pub fn require_db(&self) -> Result<&SqlitePool, KanbanError> {
        self.db
            .as_ref()
            .ok_or_else(|| KanbanError::Internal("Database not available".into()))
    }

    /// Fire-and-forget: having no subscribers is not an error.
    pub fn publish(&self, event: SseEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => {
                let _ = self.sse_tx.send(payload);
            }
            Err(e) => tracing::warn!("Failed to serialize event: {}", e),
        }
    }
}
