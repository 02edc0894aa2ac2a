use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::KanbanError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: String,
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Card {
    pub fn new(column_id: &str, title: &str, description: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            column_id: column_id.to_string(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            blocked: false,
            block_reason: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Blank titles leave the current one untouched.
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        self.title = title.to_string();
        tracing::debug!(card_id = %self.id, "Card title set to: {}", self.title);
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
        tracing::debug!(card_id = %self.id, "Card description updated");
    }

    pub fn block(&mut self, reason: &str) -> Result<(), KanbanError> {
        if self.blocked {
            return Err(KanbanError::Conflict(format!(
                "Card {} is already blocked",
                self.id
            )));
        }

        self.blocked = true;
        self.block_reason = Some(reason.to_string());
        self.touch();
        tracing::info!(card_id = %self.id, "Card blocked. Reason: {}", reason);
        Ok(())
    }

    pub fn unblock(&mut self, reason: &str) -> Result<(), KanbanError> {
        if !self.blocked {
            return Err(KanbanError::Conflict(format!(
                "Card {} is not blocked",
                self.id
            )));
        }

        self.blocked = false;
        self.block_reason = None;
        self.touch();
        tracing::info!(card_id = %self.id, "Card unblocked. Reason: {}", reason);
        Ok(())
    }

    pub fn can_move(&self) -> bool {
        if self.blocked {
            tracing::warn!(card_id = %self.id, "Card cannot be moved while blocked");
            return false;
        }
        true
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}

/// One blocked period of a card. Open while `unblocked_at` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Block {
    pub id: String,
    pub card_id: String,
    pub block_reason: String,
    pub blocked_at: String,
    pub unblock_reason: Option<String>,
    pub unblocked_at: Option<String>,
}

impl Block {
    pub fn open(card_id: &str, reason: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            card_id: card_id.to_string(),
            block_reason: reason.to_string(),
            blocked_at: Utc::now().to_rfc3339(),
            unblock_reason: None,
            unblocked_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.unblocked_at.is_none()
    }
}
