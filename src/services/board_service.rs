use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::api::dto::{
    AddColumnRequest, BoardResponse, BoardSummary, ColumnSummary, CreateBoardRequest,
    RenameBoardRequest,
};
use crate::domain::validation::{validate_board, validate_column, Validate};
use crate::domain::{Board, BoardColumn, Card, ColumnKind, KanbanError};
use crate::infrastructure::db;

pub const DEFAULT_INITIAL_COLUMN: &str = "To Do";
pub const DEFAULT_PENDING_COLUMN: &str = "In Progress";
pub const DEFAULT_FINAL_COLUMN: &str = "Done";
pub const DEFAULT_CANCEL_COLUMN: &str = "Cancelled";

pub struct BoardService;

impl BoardService {
    // ── Board CRUD ─────────────────────────────────────────────

    pub async fn create_board(
        pool: &SqlitePool,
        req: CreateBoardRequest,
    ) -> Result<BoardResponse, KanbanError> {
        let mut board = Board::new(&req.name);

        board.add_column(
            req.initial_column.as_deref().unwrap_or(DEFAULT_INITIAL_COLUMN),
            ColumnKind::Initial,
        );
        let pending = req
            .pending_columns
            .unwrap_or_else(|| vec![DEFAULT_PENDING_COLUMN.into()]);
        for name in &pending {
            board.add_column(name, ColumnKind::Pending);
        }
        board.add_column(
            req.final_column.as_deref().unwrap_or(DEFAULT_FINAL_COLUMN),
            ColumnKind::Final,
        );
        board.add_column(
            req.cancel_column.as_deref().unwrap_or(DEFAULT_CANCEL_COLUMN),
            ColumnKind::Cancel,
        );

        validate_board(&board)?;
        for column in &board.columns {
            validate_column(column)?;
        }

        let mut tx = db::begin_write(pool).await?;

        sqlx::query("INSERT INTO boards (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&board.id)
            .bind(&board.name)
            .bind(&board.created_at)
            .bind(&board.updated_at)
            .execute(&mut *tx)
            .await?;

        for column in &board.columns {
            Self::insert_column(&mut tx, column).await?;
        }

        tx.commit().await?;

        tracing::info!(
            board_id = %board.id,
            "Board '{}' created with {} columns",
            board.name,
            board.columns.len()
        );

        Self::get_board(pool, &board.id).await
    }

    pub async fn list_boards(pool: &SqlitePool) -> Result<Vec<BoardSummary>, KanbanError> {
        let boards: Vec<BoardSummary> = sqlx::query_as(
            r#"
            SELECT
                b.id, b.name, b.created_at, b.updated_at,
                (SELECT COUNT(*) FROM boards_columns bc WHERE bc.board_id = b.id) AS column_count,
                (SELECT COUNT(*) FROM cards c JOIN boards_columns bc ON bc.id = c.column_id
                    WHERE bc.board_id = b.id) AS card_count
            FROM boards b
            ORDER BY b.created_at ASC, b.name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    pub async fn get_board(pool: &SqlitePool, id: &str) -> Result<BoardResponse, KanbanError> {
        let board: Board = sqlx::query_as("SELECT * FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Board not found: {}", id)))?;

        let columns: Vec<ColumnSummary> = sqlx::query_as(
            r#"
            SELECT
                bc.id, bc.name, bc.position, bc.kind,
                (SELECT COUNT(*) FROM cards c WHERE c.column_id = bc.id) AS card_count
            FROM boards_columns bc
            WHERE bc.board_id = ?
            ORDER BY bc.position ASC
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(BoardResponse {
            id: board.id,
            name: board.name,
            created_at: board.created_at,
            updated_at: board.updated_at,
            columns,
        })
    }

    pub async fn rename_board(
        pool: &SqlitePool,
        id: &str,
        req: RenameBoardRequest,
    ) -> Result<BoardResponse, KanbanError> {
        let mut board: Board = sqlx::query_as("SELECT * FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Board not found: {}", id)))?;

        board.name = req.name.trim().to_string();
        board.validate()?;

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE boards SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&board.name)
            .bind(&now)
            .bind(id)
            .execute(pool)
            .await?;

        tracing::info!(board_id = id, "Board renamed to '{}'", board.name);

        Self::get_board(pool, id).await
    }

    pub async fn delete_board(pool: &SqlitePool, id: &str) -> Result<(), KanbanError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Board not found: {}", id)));
        }

        tracing::info!(board_id = id, "Board deleted");
        Ok(())
    }

    // ── Column Operations ──────────────────────────────────────

    pub async fn add_column(
        pool: &SqlitePool,
        board_id: &str,
        req: AddColumnRequest,
    ) -> Result<BoardResponse, KanbanError> {
        let mut tx = db::begin_write(pool).await?;

        let mut board = Self::load_board(&mut tx, board_id).await?;
        let column = board.insert_pending_column(&req.name).clone();
        validate_column(&column)?;

        for existing in board.columns.iter().filter(|c| c.id != column.id) {
            sqlx::query("UPDATE boards_columns SET position = ? WHERE id = ?")
                .bind(existing.position)
                .bind(&existing.id)
                .execute(&mut *tx)
                .await?;
        }
        Self::insert_column(&mut tx, &column).await?;

        sqlx::query("UPDATE boards SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(board_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            board_id,
            column_id = %column.id,
            "Column '{}' added at position {}",
            column.name,
            column.position
        );

        Self::get_board(pool, board_id).await
    }

    pub async fn get_column(pool: &SqlitePool, id: &str) -> Result<BoardColumn, KanbanError> {
        let mut conn = pool.acquire().await?;
        Self::load_column(&mut conn, id).await
    }

    // ── Loaders shared with CardService ────────────────────────

    /// Board with its columns ordered by position. Cards are not loaded.
    pub async fn load_board(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Board, KanbanError> {
        let mut board: Board = sqlx::query_as("SELECT * FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Board not found: {}", id)))?;

        board.columns = sqlx::query_as(
            "SELECT * FROM boards_columns WHERE board_id = ? ORDER BY position ASC",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(board)
    }

    /// Column with its cards, oldest first.
    pub async fn load_column(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<BoardColumn, KanbanError> {
        let mut column = Self::load_column_row(conn, id).await?;

        let cards: Vec<Card> =
            sqlx::query_as("SELECT * FROM cards WHERE column_id = ? ORDER BY created_at ASC, id ASC")
                .bind(id)
                .fetch_all(&mut *conn)
                .await?;
        for card in cards {
            column.add_card(card);
        }

        Ok(column)
    }

    pub async fn load_column_row(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<BoardColumn, KanbanError> {
        let column: BoardColumn = sqlx::query_as("SELECT * FROM boards_columns WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Column not found: {}", id)))?;

        Ok(column)
    }

    async fn insert_column(
        conn: &mut SqliteConnection,
        column: &BoardColumn,
    ) -> Result<(), KanbanError> {
        sqlx::query(
            "INSERT INTO boards_columns (id, board_id, name, position, kind) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&column.id)
        .bind(&column.board_id)
        .bind(&column.name)
        .bind(column.position)
        .bind(column.kind)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
