use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{
    AddColumnRequest, BoardResponse, BoardSummary, CardResponse, CreateBoardRequest,
    CreateCardRequest, RenameBoardRequest,
};
use crate::api::handlers::sse::SseEvent;
use crate::api::state::AppState;
use crate::domain::KanbanError;
use crate::services::{BoardService, CardService};

pub async fn list_boards(
    State(state): State<AppState>,
) -> Result<Json<Vec<BoardSummary>>, KanbanError> {
    let pool = state.require_db()?;
    let boards = BoardService::list_boards(pool).await?;
    Ok(Json(boards))
}

pub async fn create_board(
    State(state): State<AppState>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), KanbanError> {
    let pool = state.require_db()?;
    let board = BoardService::create_board(pool, req).await?;

    state.publish(SseEvent::BoardCreated {
        board_id: board.id.clone(),
        name: board.name.clone(),
    });

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BoardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let board = BoardService::get_board(pool, &id).await?;
    Ok(Json(board))
}

pub async fn rename_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameBoardRequest>,
) -> Result<Json<BoardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let board = BoardService::rename_board(pool, &id, req).await?;

    state.publish(SseEvent::BoardUpdated { board_id: id });

    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, KanbanError> {
    let pool = state.require_db()?;
    BoardService::delete_board(pool, &id).await?;

    state.publish(SseEvent::BoardDeleted { board_id: id });

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddColumnRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), KanbanError> {
    let pool = state.require_db()?;
    let board = BoardService::add_column(pool, &id, req).await?;

    state.publish(SseEvent::BoardUpdated { board_id: id });

    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn create_card(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(req): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), KanbanError> {
    let pool = state.require_db()?;
    let card =
        CardService::create_card(pool, &board_id, req, state.config.max_cards_per_column).await?;

    state.publish(SseEvent::CardCreated {
        board_id,
        card_id: card.card.id.clone(),
        title: card.card.title.clone(),
    });

    Ok((StatusCode::CREATED, Json(card)))
}
