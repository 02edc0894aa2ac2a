use serde::{Deserialize, Serialize};

use crate::domain::{Card, ColumnKind};

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CardResponse {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub card: Card,
    pub board_id: String,
    pub column_name: String,
    pub column_kind: ColumnKind,
    pub block_count: i64,
}

/// Result of a move or cancel: the card as it is now and the column it left.
#[derive(Debug)]
pub struct CardMove {
    pub card: CardResponse,
    pub from_column: String,
}
