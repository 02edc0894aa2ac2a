use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::column::{BoardColumn, ColumnKind};
use crate::domain::KanbanError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub columns: Vec<BoardColumn>,
}

impl Board {
    pub fn new(name: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: now.clone(),
            updated_at: now,
            columns: Vec::new(),
        }
    }

    /// Appends a column after the current last one.
    pub fn add_column(&mut self, name: &str, kind: ColumnKind) -> &BoardColumn {
        let position = self.columns.len() as i64;
        self.columns
            .push(BoardColumn::new(&self.id, name, position, kind));
        tracing::debug!(board_id = %self.id, "Column '{}' added to board", name);
        &self.columns[self.columns.len() - 1]
    }

    /// Inserts a pending column ahead of the final column, or ahead of the
    /// cancel column when the board has no final column.
    pub fn insert_pending_column(&mut self, name: &str) -> &BoardColumn {
        let index = self
            .columns
            .iter()
            .position(|c| c.kind == ColumnKind::Final)
            .or_else(|| self.columns.iter().position(|c| c.kind == ColumnKind::Cancel))
            .unwrap_or(self.columns.len());

        self.columns.insert(
            index,
            BoardColumn::new(&self.id, name, index as i64, ColumnKind::Pending),
        );
        for (position, column) in self.columns.iter_mut().enumerate() {
            column.position = position as i64;
        }
        tracing::debug!(board_id = %self.id, position = index, "Pending column '{}' inserted", name);

        &self.columns[index]
    }

    pub fn column(&self, column_id: &str) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn initial_column(&self) -> Result<&BoardColumn, KanbanError> {
        tracing::debug!(board_id = %self.id, "Looking up initial column");
        self.column_of_kind(ColumnKind::Initial)
    }

    pub fn final_column(&self) -> Result<&BoardColumn, KanbanError> {
        self.column_of_kind(ColumnKind::Final)
    }

    pub fn cancel_column(&self) -> Result<&BoardColumn, KanbanError> {
        tracing::debug!(board_id = %self.id, "Looking up cancel column");
        self.column_of_kind(ColumnKind::Cancel)
    }

    fn column_of_kind(&self, kind: ColumnKind) -> Result<&BoardColumn, KanbanError> {
        self.columns
            .iter()
            .find(|c| c.kind == kind)
            .ok_or_else(|| {
                tracing::error!(board_id = %self.id, "No {} column found", kind);
                KanbanError::MissingColumn(kind)
            })
    }

    pub fn has_required_columns(&self) -> bool {
        let has_initial = self.columns.iter().any(|c| c.kind == ColumnKind::Initial);
        let has_cancel = self.columns.iter().any(|c| c.kind == ColumnKind::Cancel);

        if !has_initial || !has_cancel {
            tracing::warn!(
                board_id = %self.id,
                "Board is invalid: it needs both an initial and a cancel column"
            );
            return false;
        }

        true
    }

    /// The column a card in `from_column_id` advances to. Cancel columns are
    /// only reachable through cancellation.
    pub fn next_column(&self, from_column_id: &str) -> Result<&BoardColumn, KanbanError> {
        let current = self.column(from_column_id).ok_or_else(|| {
            KanbanError::NotFound(format!("Column not found: {}", from_column_id))
        })?;

        match current.kind {
            ColumnKind::Final => {
                return Err(KanbanError::Conflict(
                    "Card is already finished and cannot move further".into(),
                ))
            }
            ColumnKind::Cancel => {
                return Err(KanbanError::Conflict(
                    "Card is cancelled and cannot be moved".into(),
                ))
            }
            ColumnKind::Initial | ColumnKind::Pending => {}
        }

        let mut ordered: Vec<&BoardColumn> = self.columns.iter().collect();
        ordered.sort_by_key(|c| c.position);

        ordered
            .into_iter()
            .find(|c| c.position > current.position && c.kind != ColumnKind::Cancel)
            .ok_or_else(|| {
                KanbanError::Conflict(format!(
                    "No column after '{}' to move the card to",
                    current.name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_default_columns() -> Board {
        let mut board = Board::new("Test Board");
        board.add_column("To Do", ColumnKind::Initial);
        board.add_column("In Progress", ColumnKind::Pending);
        board.add_column("Done", ColumnKind::Final);
        board.add_column("Cancelled", ColumnKind::Cancel);
        board
    }

    #[test]
    fn default_columns_make_a_valid_board() {
        let board = board_with_default_columns();

        assert!(board.has_required_columns());
        assert_eq!(board.columns.len(), 4);
        assert_eq!(board.initial_column().unwrap().name, "To Do");
        assert_eq!(board.cancel_column().unwrap().name, "Cancelled");
        assert_eq!(board.final_column().unwrap().name, "Done");
    }

    #[test]
    fn board_without_initial_column_is_invalid() {
        let mut board = Board::new("Test Board");
        board.add_column("In Progress", ColumnKind::Pending);
        board.add_column("Done", ColumnKind::Final);
        board.add_column("Cancelled", ColumnKind::Cancel);

        assert!(!board.has_required_columns());
    }

    #[test]
    fn board_without_cancel_column_is_invalid() {
        let mut board = Board::new("Test Board");
        board.add_column("To Do", ColumnKind::Initial);
        board.add_column("In Progress", ColumnKind::Pending);
        board.add_column("Done", ColumnKind::Final);

        assert!(!board.has_required_columns());
    }

    #[test]
    fn add_column_assigns_positions_and_board() {
        let mut board = Board::new("Test Board");
        board.add_column("New Column", ColumnKind::Pending);
        board.add_column("Another", ColumnKind::Pending);

        assert_eq!(board.columns.len(), 2);
        assert_eq!(board.columns[0].name, "New Column");
        assert_eq!(board.columns[1].position, 1);
        assert!(board.columns.iter().all(|c| c.board_id == board.id));
    }

    #[test]
    fn missing_cancel_column_is_an_error() {
        let mut board = Board::new("Test Board");
        board.add_column("To Do", ColumnKind::Initial);

        assert!(matches!(
            board.cancel_column(),
            Err(KanbanError::MissingColumn(ColumnKind::Cancel))
        ));
    }

    #[test]
    fn insert_pending_column_goes_before_final() {
        let mut board = board_with_default_columns();
        board.insert_pending_column("Review");

        let names: Vec<&str> = board.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["To Do", "In Progress", "Review", "Done", "Cancelled"]);
        let positions: Vec<i64> = board.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn next_column_follows_position_order() {
        let board = board_with_default_columns();
        let initial = board.initial_column().unwrap().id.clone();
        let pending = board.columns[1].id.clone();

        assert_eq!(board.next_column(&initial).unwrap().name, "In Progress");
        assert_eq!(board.next_column(&pending).unwrap().name, "Done");
    }

    #[test]
    fn next_column_skips_cancel() {
        let mut board = Board::new("Test Board");
        board.add_column("To Do", ColumnKind::Initial);
        board.add_column("Cancelled", ColumnKind::Cancel);
        let initial = board.columns[0].id.clone();

        assert!(matches!(board.next_column(&initial), Err(KanbanError::Conflict(_))));
    }

    #[test]
    fn terminal_columns_have_no_next() {
        let board = board_with_default_columns();
        let done = board.final_column().unwrap().id.clone();
        let cancelled = board.cancel_column().unwrap().id.clone();

        assert!(matches!(board.next_column(&done), Err(KanbanError::Conflict(_))));
        assert!(matches!(board.next_column(&cancelled), Err(KanbanError::Conflict(_))));
        assert!(matches!(board.next_column("missing"), Err(KanbanError::NotFound(_))));
    }
}
