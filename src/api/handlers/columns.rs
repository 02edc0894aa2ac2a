use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::AppState;
use crate::domain::{BoardColumn, KanbanError};
use crate::services::BoardService;

pub async fn get_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BoardColumn>, KanbanError> {
    let pool = state.require_db()?;
    let column = BoardService::get_column(pool, &id).await?;
    Ok(Json(column))
}
