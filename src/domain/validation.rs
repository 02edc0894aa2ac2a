//! Field constraints for boards, columns and cards.
//!
//! Every entity reports its own [`Violation`]s; [`Validate::validate`] turns
//! a non-empty list into [`KanbanError::Validation`] and logs each one.

use serde::Serialize;

use crate::domain::board::Board;
use crate::domain::card::Card;
use crate::domain::column::BoardColumn;
use crate::domain::KanbanError;

pub const BOARD_NAME_MIN: usize = 3;
pub const BOARD_NAME_MAX: usize = 100;
pub const COLUMN_NAME_MIN: usize = 2;
pub const COLUMN_NAME_MAX: usize = 50;
pub const CARD_TITLE_MIN: usize = 3;
pub const CARD_TITLE_MAX: usize = 100;
pub const CARD_DESCRIPTION_MAX: usize = 500;
pub const REASON_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub trait Validate {
    fn entity_name(&self) -> &'static str;

    fn violations(&self) -> Vec<Violation>;

    fn validate(&self) -> Result<(), KanbanError> {
        let violations = self.violations();
        if violations.is_empty() {
            return Ok(());
        }

        tracing::warn!(
            "{} has {} validation violation(s)",
            self.entity_name(),
            violations.len()
        );
        for violation in &violations {
            tracing::warn!("Field '{}': {}", violation.field, violation.message);
        }

        Err(KanbanError::Validation(violations))
    }

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Checks a required text field against a character-count range.
pub fn check_text(
    violations: &mut Vec<Violation>,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    if value.trim().is_empty() {
        violations.push(Violation::new(field, format!("{} must not be blank", label)));
        return;
    }

    let len = value.chars().count();
    if len < min || len > max {
        let message = if min == 0 {
            format!("{} must be at most {} characters", label, max)
        } else {
            format!("{} must be between {} and {} characters", label, min, max)
        };
        violations.push(Violation::new(field, message));
    }
}

impl Validate for Board {
    fn entity_name(&self) -> &'static str {
        "Board"
    }

    fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_text(
            &mut violations,
            "name",
            "board name",
            &self.name,
            BOARD_NAME_MIN,
            BOARD_NAME_MAX,
        );
        violations
    }
}

impl Validate for BoardColumn {
    fn entity_name(&self) -> &'static str {
        "BoardColumn"
    }

    fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_text(
            &mut violations,
            "name",
            "column name",
            &self.name,
            COLUMN_NAME_MIN,
            COLUMN_NAME_MAX,
        );
        violations
    }
}

impl Validate for Card {
    fn entity_name(&self) -> &'static str {
        "Card"
    }

    fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_text(
            &mut violations,
            "title",
            "card title",
            &self.title,
            CARD_TITLE_MIN,
            CARD_TITLE_MAX,
        );
        check_text(
            &mut violations,
            "description",
            "card description",
            &self.description,
            0,
            CARD_DESCRIPTION_MAX,
        );
        violations
    }
}

/// Field constraints plus at least one column.
pub fn validate_board(board: &Board) -> Result<(), KanbanError> {
    board.validate()?;

    if board.columns.is_empty() {
        tracing::warn!("Board must have at least one column");
        return Err(KanbanError::Validation(vec![Violation::new(
            "columns",
            "board must have at least one column",
        )]));
    }

    Ok(())
}

/// Field constraints plus an associated column.
pub fn validate_card(card: &Card) -> Result<(), KanbanError> {
    card.validate()?;

    if card.column_id.trim().is_empty() {
        tracing::warn!("Card must be associated with a column");
        return Err(KanbanError::Validation(vec![Violation::new(
            "column_id",
            "card must be associated with a column",
        )]));
    }

    Ok(())
}

/// The kind is part of the column's type, so only field constraints remain.
pub fn validate_column(column: &BoardColumn) -> Result<(), KanbanError> {
    column.validate()
}

pub fn validate_reason(field: &'static str, reason: &str) -> Result<(), KanbanError> {
    let mut violations = Vec::new();
    check_text(&mut violations, field, field, reason, 0, REASON_MAX);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(KanbanError::Validation(violations))
    }
}

pub fn is_valid_board(board: &Board) -> bool {
    validate_board(board).is_ok()
}

pub fn is_valid_card(card: &Card) -> bool {
    validate_card(card).is_ok()
}

pub fn is_valid_column(column: &BoardColumn) -> bool {
    validate_column(column).is_ok()
}
