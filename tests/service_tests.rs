mod common;

use kanban_board::api::dto::{
    AddColumnRequest, CreateBoardRequest, CreateCardRequest, UpdateCardRequest,
};
use kanban_board::domain::{ColumnKind, KanbanError};
use kanban_board::infrastructure::db;
use kanban_board::services::{BoardService, CardService};

fn card_request(title: &str) -> CreateCardRequest {
    CreateCardRequest {
        title: title.to_string(),
        description: "Card description".to_string(),
    }
}

#[tokio::test]
async fn board_without_pending_columns() {
    let pool = common::setup_test_db().await;

    let mut req = CreateBoardRequest::named("Lean Board");
    req.pending_columns = Some(vec![]);
    let board = BoardService::create_board(&pool, req).await.unwrap();

    let kinds: Vec<ColumnKind> = board.columns.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ColumnKind::Initial, ColumnKind::Final, ColumnKind::Cancel]
    );

    let card = CardService::create_card(&pool, &board.id, card_request("Quick fix"), 100)
        .await
        .unwrap();
    let moved = CardService::move_card(&pool, &card.card.id, 100).await.unwrap();
    assert_eq!(moved.card.column_kind, ColumnKind::Final);
    assert_eq!(moved.from_column, "To Do");
}

#[tokio::test]
async fn invalid_column_name_rolls_back_board() {
    let pool = common::setup_test_db().await;

    let mut req = CreateBoardRequest::named("Broken Board");
    req.pending_columns = Some(vec!["X".into()]);
    let err = BoardService::create_board(&pool, req).await.unwrap_err();

    assert!(matches!(err, KanbanError::Validation(_)));
    assert!(BoardService::list_boards(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn move_into_full_column_conflicts() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Tight Board"))
        .await
        .unwrap();

    let first = CardService::create_card(&pool, &board.id, card_request("First"), 1)
        .await
        .unwrap();
    CardService::move_card(&pool, &first.card.id, 1).await.unwrap();

    let second = CardService::create_card(&pool, &board.id, card_request("Second"), 1)
        .await
        .unwrap();
    let err = CardService::move_card(&pool, &second.card.id, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, KanbanError::Conflict(_)));
    let unchanged = CardService::get_card(&pool, &second.card.id).await.unwrap();
    assert_eq!(unchanged.column_kind, ColumnKind::Initial);
}

#[tokio::test]
async fn finished_cards_cannot_be_blocked_or_cancelled() {
    let pool = common::setup_test_db().await;
    let mut req = CreateBoardRequest::named("Done Board");
    req.pending_columns = Some(vec![]);
    let board = BoardService::create_board(&pool, req).await.unwrap();

    let card = CardService::create_card(&pool, &board.id, card_request("Shipped"), 100)
        .await
        .unwrap();
    CardService::move_card(&pool, &card.card.id, 100).await.unwrap();

    assert!(matches!(
        CardService::block_card(&pool, &card.card.id, "too late").await,
        Err(KanbanError::Conflict(_))
    ));
    assert!(matches!(
        CardService::cancel_card(&pool, &card.card.id).await,
        Err(KanbanError::Conflict(_))
    ));
}

#[tokio::test]
async fn repeated_blocks_build_history() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("History Board"))
        .await
        .unwrap();
    let card = CardService::create_card(&pool, &board.id, card_request("Flaky"), 100)
        .await
        .unwrap();
    let id = card.card.id.as_str();

    CardService::block_card(&pool, id, "first").await.unwrap();
    assert!(matches!(
        CardService::block_card(&pool, id, "again").await,
        Err(KanbanError::Conflict(_))
    ));
    CardService::unblock_card(&pool, id, "resolved").await.unwrap();
    CardService::block_card(&pool, id, "second").await.unwrap();

    let blocks = CardService::list_blocks(&pool, id).await.unwrap();
    assert_eq!(blocks.len(), 2);
    assert!(!blocks[0].is_open());
    assert_eq!(blocks[0].unblock_reason.as_deref(), Some("resolved"));
    assert!(blocks[1].is_open());
    assert_eq!(blocks[1].block_reason, "second");

    assert!(matches!(
        CardService::unblock_card(&pool, "missing", "whatever").await,
        Err(KanbanError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_card_validates_after_applying_changes() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Edit Board"))
        .await
        .unwrap();
    let card = CardService::create_card(&pool, &board.id, card_request("Editable"), 100)
        .await
        .unwrap();

    let err = CardService::update_card(
        &pool,
        &card.card.id,
        UpdateCardRequest {
            title: Some("AB".into()),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, KanbanError::Validation(_)));

    let unchanged = CardService::get_card(&pool, &card.card.id).await.unwrap();
    assert_eq!(unchanged.card.title, "Editable");
}

#[tokio::test]
async fn added_column_joins_the_workflow() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Growing Board"))
        .await
        .unwrap();
    BoardService::add_column(
        &pool,
        &board.id,
        AddColumnRequest {
            name: "Review".into(),
        },
    )
    .await
    .unwrap();

    let card = CardService::create_card(&pool, &board.id, card_request("Reviewed"), 100)
        .await
        .unwrap();
    CardService::move_card(&pool, &card.card.id, 100).await.unwrap();
    let moved = CardService::move_card(&pool, &card.card.id, 100).await.unwrap();

    assert_eq!(moved.from_column, "In Progress");
    assert_eq!(moved.card.column_name, "Review");
}

#[tokio::test]
async fn cancel_reports_the_column_it_left() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Abandon Board"))
        .await
        .unwrap();
    let card = CardService::create_card(&pool, &board.id, card_request("Dropped idea"), 100)
        .await
        .unwrap();
    CardService::move_card(&pool, &card.card.id, 100).await.unwrap();

    let cancelled = CardService::cancel_card(&pool, &card.card.id).await.unwrap();

    assert_eq!(cancelled.from_column, "In Progress");
    assert_eq!(cancelled.card.column_kind, ColumnKind::Cancel);
}

async fn file_backed_pool() -> (tempfile::TempDir, sqlx::SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("board.db").display());
    let pool = db::init_db(&url, 5).await.unwrap();
    (dir, pool)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_card_creation_on_file_database() {
    let (_dir, pool) = file_backed_pool().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Busy Board"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let pool = pool.clone();
            let board_id = board.id.clone();
            let req = card_request(&format!("Task {}", i));
            tokio::spawn(async move { CardService::create_card(&pool, &board_id, req, 100).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let initial = board.columns[0].id.clone();
    let column = BoardService::get_column(&pool, &initial).await.unwrap();
    assert_eq!(column.cards.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creation_respects_column_limit() {
    let (_dir, pool) = file_backed_pool().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Capped Board"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let pool = pool.clone();
            let board_id = board.id.clone();
            let req = card_request(&format!("Task {}", i));
            tokio::spawn(async move { CardService::create_card(&pool, &board_id, req, 10).await })
        })
        .collect();

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(KanbanError::Conflict(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 10);
    assert_eq!(rejected, 10);
}

#[tokio::test]
async fn deleting_board_removes_its_cards() {
    let pool = common::setup_test_db().await;
    let board = BoardService::create_board(&pool, CreateBoardRequest::named("Temp Board"))
        .await
        .unwrap();
    let card = CardService::create_card(&pool, &board.id, card_request("Orphan"), 100)
        .await
        .unwrap();
    CardService::block_card(&pool, &card.card.id, "pending").await.unwrap();

    BoardService::delete_board(&pool, &board.id).await.unwrap();

    assert!(matches!(
        CardService::get_card(&pool, &card.card.id).await,
        Err(KanbanError::NotFound(_))
    ));
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blocks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(matches!(
        BoardService::delete_board(&pool, &board.id).await,
        Err(KanbanError::NotFound(_))
    ));
}
