use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ColumnKind {
    Initial,
    Pending,
    Final,
    Cancel,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Initial => "initial",
            ColumnKind::Pending => "pending",
            ColumnKind::Final => "final",
            ColumnKind::Cancel => "cancel",
        }
    }

    pub fn all() -> &'static [ColumnKind] {
        &[
            ColumnKind::Initial,
            ColumnKind::Pending,
            ColumnKind::Final,
            ColumnKind::Cancel,
        ]
    }

    /// Cards in final or cancel columns are done with the workflow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ColumnKind::Final | ColumnKind::Cancel)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(ColumnKind::Initial),
            "pending" => Ok(ColumnKind::Pending),
            "final" => Ok(ColumnKind::Final),
            "cancel" => Ok(ColumnKind::Cancel),
            _ => Err(format!("Invalid column kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoardColumn {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub position: i64,
    pub kind: ColumnKind,
    #[sqlx(skip)]
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl BoardColumn {
    pub fn new(board_id: &str, name: &str, position: i64, kind: ColumnKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            board_id: board_id.to_string(),
            name: name.trim().to_string(),
            position,
            kind,
            cards: Vec::new(),
        }
    }

    pub fn add_card(&mut self, mut card: Card) {
        card.column_id = self.id.clone();
        tracing::debug!(card_id = %card.id, column_id = %self.id, "Card added to column");
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, card_id: &str) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == card_id)?;
        tracing::debug!(card_id, column_id = %self.id, "Card removed from column");
        Some(self.cards.remove(index))
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_full(&self, max_cards: usize) -> bool {
        let full = self.cards.len() >= max_cards;
        if full {
            tracing::warn!(
                column_id = %self.id,
                "Column is full ({} cards)",
                self.cards.len()
            );
        }
        full
    }
}
