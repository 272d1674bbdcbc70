use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::parse_id;
use crate::{
    auth::AuthenticatedUser,
    error::Result,
    models::{BoardWithCount, CreateBoardRequest},
    AppState,
};

/// List the caller's boards with their thumbnail counts
pub async fn list_boards(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<BoardWithCount>>> {
    let boards = state.service.list_boards(&auth).await?;
    Ok(Json(boards))
}

/// Create a board owned by the caller
pub async fn create_board(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    payload: std::result::Result<Json<CreateBoardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(req) = payload?;
    let board = state.service.create_board(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": board.id }))))
}

/// Delete a board and every thumbnail on it
pub async fn delete_board(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(board_id): Path<String>,
) -> Result<Json<Value>> {
    let board_id = parse_id(&board_id, "Board")?;
    state.service.delete_board(&auth, board_id).await?;
    Ok(Json(json!({ "message": "Board deleted" })))
}
