use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::dto::{CardMove, CardResponse, ReasonRequest, UpdateCardRequest};
use crate::api::handlers::sse::SseEvent;
use crate::api::AppState;
use crate::domain::{Block, KanbanError};
use crate::services::CardService;

pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::get_card(pool, &id).await?;
    Ok(Json(card))
}

pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::update_card(pool, &id, req).await?;

    state.publish(SseEvent::CardUpdated {
        board_id: card.board_id.clone(),
        card_id: id,
    });

    Ok(Json(card))
}

pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, KanbanError> {
    let pool = state.require_db()?;
    CardService::delete_card(pool, &id).await?;

    state.publish(SseEvent::CardDeleted { card_id: id });

    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let moved = CardService::move_card(pool, &id, state.config.max_cards_per_column).await?;

    Ok(Json(publish_move(&state, moved)))
}

pub async fn cancel_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let moved = CardService::cancel_card(pool, &id).await?;

    Ok(Json(publish_move(&state, moved)))
}

pub async fn block_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::block_card(pool, &id, &req.reason).await?;

    state.publish(SseEvent::CardBlocked {
        board_id: card.board_id.clone(),
        card_id: id,
        reason: card.card.block_reason.clone().unwrap_or_default(),
    });

    Ok(Json(card))
}

pub async fn unblock_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<CardResponse>, KanbanError> {
    let pool = state.require_db()?;
    let card = CardService::unblock_card(pool, &id, &req.reason).await?;

    state.publish(SseEvent::CardUnblocked {
        board_id: card.board_id.clone(),
        card_id: id,
        reason: req.reason.trim().to_string(),
    });

    Ok(Json(card))
}

pub async fn list_blocks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Block>>, KanbanError> {
    let pool = state.require_db()?;
    let blocks = CardService::list_blocks(pool, &id).await?;
    Ok(Json(blocks))
}

fn publish_move(state: &AppState, moved: CardMove) -> CardResponse {
    let CardMove { card, from_column } = moved;
    state.publish(SseEvent::CardMoved {
        board_id: card.board_id.clone(),
        card_id: card.card.id.clone(),
        from_column,
        to_column: card.column_name.clone(),
    });
    card
}
