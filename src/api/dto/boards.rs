use serde::{Deserialize, Serialize};

use crate::domain::ColumnKind;

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    #[serde(default)]
    pub initial_column: Option<String>,
    /// `None` gives the default single pending column; an empty list gives none.
    #[serde(default)]
    pub pending_columns: Option<Vec<String>>,
    #[serde(default)]
    pub final_column: Option<String>,
    #[serde(default)]
    pub cancel_column: Option<String>,
}

impl CreateBoardRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            initial_column: None,
            pending_columns: None,
            final_column: None,
            cancel_column: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameBoardRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddColumnRequest {
    pub name: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub column_count: i64,
    pub card_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ColumnSummary {
    pub id: String,
    pub name: String,
    pub position: i64,
    pub kind: ColumnKind,
    pub card_count: i64,
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub columns: Vec<ColumnSummary>,
}
