use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::api::dto::{CardMove, CardResponse, CreateCardRequest, UpdateCardRequest};
use crate::domain::validation::{validate_card, validate_reason};
use crate::domain::{Block, Card, ColumnKind, KanbanError};
use crate::infrastructure::db;
use crate::services::BoardService;

pub struct CardService;

impl CardService {
    // ── Card CRUD ──────────────────────────────────────────────

    /// New cards always land in the board's initial column.
    pub async fn create_card(
        pool: &SqlitePool,
        board_id: &str,
        req: CreateCardRequest,
        max_cards_per_column: usize,
    ) -> Result<CardResponse, KanbanError> {
        let mut tx = db::begin_write(pool).await?;

        let board = BoardService::load_board(&mut tx, board_id).await?;
        let initial_id = board.initial_column()?.id.clone();

        let mut column = BoardService::load_column(&mut tx, &initial_id).await?;
        if column.is_full(max_cards_per_column) {
            return Err(KanbanError::Conflict(format!(
                "Column '{}' is full ({} cards)",
                column.name,
                column.card_count()
            )));
        }

        let card = Card::new(&column.id, &req.title, &req.description);
        validate_card(&card)?;

        sqlx::query(
            "INSERT INTO cards (id, column_id, title, description, blocked, block_reason, created_at, updated_at) VALUES (?, ?, ?, ?, 0, NULL, ?, ?)",
        )
        .bind(&card.id)
        .bind(&card.column_id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(&card.created_at)
        .bind(&card.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let card_id = card.id.clone();
        column.add_card(card);
        tracing::info!(
            card_id = %card_id,
            board_id,
            "Card created in column '{}' ({} cards)",
            column.name,
            column.card_count()
        );

        Self::get_card(pool, &card_id).await
    }

    pub async fn get_card(pool: &SqlitePool, id: &str) -> Result<CardResponse, KanbanError> {
        let card: CardResponse = sqlx::query_as(
            r#"
            SELECT
                c.id, c.column_id, c.title, c.description, c.blocked, c.block_reason,
                c.created_at, c.updated_at,
                bc.board_id, bc.name AS column_name, bc.kind AS column_kind,
                (SELECT COUNT(*) FROM blocks b WHERE b.card_id = c.id) AS block_count
            FROM cards c
            JOIN boards_columns bc ON bc.id = c.column_id
            WHERE c.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| KanbanError::NotFound(format!("Card not found: {}", id)))?;

        Ok(card)
    }

    pub async fn get_card_model(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Card, KanbanError> {
        let card: Card = sqlx::query_as("SELECT * FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("Card not found: {}", id)))?;

        Ok(card)
    }

    pub async fn update_card(
        pool: &SqlitePool,
        id: &str,
        req: UpdateCardRequest,
    ) -> Result<CardResponse, KanbanError> {
        let mut conn = pool.acquire().await?;
        let mut card = Self::get_card_model(&mut conn, id).await?;

        if let Some(title) = &req.title {
            card.set_title(title);
        }
        if let Some(description) = &req.description {
            card.set_description(description);
        }
        card.touch();
        validate_card(&card)?;

        sqlx::query("UPDATE cards SET title = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&card.title)
            .bind(&card.description)
            .bind(&card.updated_at)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        drop(conn);

        Self::get_card(pool, id).await
    }

    pub async fn delete_card(pool: &SqlitePool, id: &str) -> Result<(), KanbanError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KanbanError::NotFound(format!("Card not found: {}", id)));
        }

        tracing::info!(card_id = id, "Card deleted");
        Ok(())
    }

    // ── Workflow ───────────────────────────────────────────────

    /// Advances the card to the next column of its board.
    pub async fn move_card(
        pool: &SqlitePool,
        id: &str,
        max_cards_per_column: usize,
    ) -> Result<CardMove, KanbanError> {
        let mut tx = db::begin_write(pool).await?;

        let mut card = Self::get_card_model(&mut tx, id).await?;
        if !card.can_move() {
            return Err(KanbanError::Conflict(format!(
                "Card {} is blocked and cannot be moved",
                id
            )));
        }

        let current = BoardService::load_column_row(&mut tx, &card.column_id).await?;
        let board = BoardService::load_board(&mut tx, &current.board_id).await?;
        let target_id = board.next_column(&card.column_id)?.id.clone();

        let target = BoardService::load_column(&mut tx, &target_id).await?;
        if target.is_full(max_cards_per_column) {
            return Err(KanbanError::Conflict(format!(
                "Column '{}' is full ({} cards)",
                target.name,
                target.card_count()
            )));
        }

        card.column_id = target.id.clone();
        card.touch();
        Self::save_column(&mut tx, &card).await?;

        tx.commit().await?;

        tracing::info!(
            card_id = id,
            from_column = %current.name,
            to_column = %target.name,
            "Card moved"
        );

        Ok(CardMove {
            card: Self::get_card(pool, id).await?,
            from_column: current.name,
        })
    }

    /// Moves the card straight to the board's cancel column.
    pub async fn cancel_card(pool: &SqlitePool, id: &str) -> Result<CardMove, KanbanError> {
        let mut tx = db::begin_write(pool).await?;

        let mut card = Self::get_card_model(&mut tx, id).await?;
        if !card.can_move() {
            return Err(KanbanError::Conflict(format!(
                "Card {} is blocked and cannot be cancelled",
                id
            )));
        }

        let current = BoardService::load_column_row(&mut tx, &card.column_id).await?;
        match current.kind {
            ColumnKind::Final => {
                return Err(KanbanError::Conflict(format!(
                    "Card {} is already finished and cannot be cancelled",
                    id
                )))
            }
            ColumnKind::Cancel => {
                return Err(KanbanError::Conflict(format!(
                    "Card {} is already cancelled",
                    id
                )))
            }
            ColumnKind::Initial | ColumnKind::Pending => {}
        }

        let board = BoardService::load_board(&mut tx, &current.board_id).await?;
        let cancel = board.cancel_column()?;

        card.column_id = cancel.id.clone();
        card.touch();
        Self::save_column(&mut tx, &card).await?;

        tx.commit().await?;

        tracing::info!(card_id = id, from_column = %current.name, "Card cancelled");

        Ok(CardMove {
            card: Self::get_card(pool, id).await?,
            from_column: current.name,
        })
    }

    pub async fn block_card(
        pool: &SqlitePool,
        id: &str,
        reason: &str,
    ) -> Result<CardResponse, KanbanError> {
        let reason = reason.trim();
        validate_reason("reason", reason)?;

        let mut tx = db::begin_write(pool).await?;

        let mut card = Self::get_card_model(&mut tx, id).await?;
        let column = BoardService::load_column_row(&mut tx, &card.column_id).await?;
        if column.kind.is_terminal() {
            return Err(KanbanError::Conflict(format!(
                "Card {} is in {} column '{}' and cannot be blocked",
                id, column.kind, column.name
            )));
        }

        card.block(reason)?;
        let block = Block::open(&card.id, reason);

        sqlx::query("UPDATE cards SET blocked = ?, block_reason = ?, updated_at = ? WHERE id = ?")
            .bind(card.blocked)
            .bind(&card.block_reason)
            .bind(&card.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO blocks (id, card_id, block_reason, blocked_at, unblock_reason, unblocked_at) VALUES (?, ?, ?, ?, NULL, NULL)",
        )
        .bind(&block.id)
        .bind(&block.card_id)
        .bind(&block.block_reason)
        .bind(&block.blocked_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Self::get_card(pool, id).await
    }

    pub async fn unblock_card(
        pool: &SqlitePool,
        id: &str,
        reason: &str,
    ) -> Result<CardResponse, KanbanError> {
        let reason = reason.trim();
        validate_reason("reason", reason)?;

        let mut tx = db::begin_write(pool).await?;

        let mut card = Self::get_card_model(&mut tx, id).await?;
        card.unblock(reason)?;

        sqlx::query("UPDATE cards SET blocked = ?, block_reason = ?, updated_at = ? WHERE id = ?")
            .bind(card.blocked)
            .bind(&card.block_reason)
            .bind(&card.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let closed = sqlx::query(
            "UPDATE blocks SET unblock_reason = ?, unblocked_at = ? WHERE card_id = ? AND unblocked_at IS NULL",
        )
        .bind(reason)
        .bind(&card.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() == 0 {
            tracing::warn!(card_id = id, "Blocked card had no open block record");
        }

        tx.commit().await?;

        Self::get_card(pool, id).await
    }

    pub async fn list_blocks(pool: &SqlitePool, card_id: &str) -> Result<Vec<Block>, KanbanError> {
        let mut conn = pool.acquire().await?;
        Self::get_card_model(&mut conn, card_id).await?;

        let blocks: Vec<Block> =
            sqlx::query_as("SELECT * FROM blocks WHERE card_id = ? ORDER BY blocked_at ASC, id ASC")
                .bind(card_id)
                .fetch_all(&mut *conn)
                .await?;

        Ok(blocks)
    }

    async fn save_column(conn: &mut SqliteConnection, card: &Card) -> Result<(), KanbanError> {
        sqlx::query("UPDATE cards SET column_id = ?, updated_at = ? WHERE id = ?")
            .bind(&card.column_id)
            .bind(&card.updated_at)
            .bind(&card.id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
