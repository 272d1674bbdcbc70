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
    models::{AddThumbnailRequest, FavoriteResponse, Thumbnail},
    AppState,
};

/// List the thumbnails on one of the caller's boards, oldest first
pub async fn list_thumbnails(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(board_id): Path<String>,
) -> Result<Json<Vec<Thumbnail>>> {
    let board_id = parse_id(&board_id, "Board")?;
    let thumbnails = state.service.list_thumbnails(&auth, board_id).await?;
    Ok(Json(thumbnails))
}

/// Resolve a video URL and pin its thumbnail to a board
pub async fn add_thumbnail(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(board_id): Path<String>,
    payload: std::result::Result<Json<AddThumbnailRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let board_id = parse_id(&board_id, "Board")?;
    let Json(req) = payload?;
    let thumbnail = state.service.add_thumbnail(&auth, board_id, req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": thumbnail.id }))))
}

pub async fn delete_thumbnail(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(thumb_id): Path<String>,
) -> Result<Json<Value>> {
    let thumb_id = parse_id(&thumb_id, "Thumbnail")?;
    state.service.delete_thumbnail(&auth, thumb_id).await?;
    Ok(Json(json!({ "message": "Thumbnail deleted" })))
}

/// Flip the favorite flag and report the new value
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(thumb_id): Path<String>,
) -> Result<Json<FavoriteResponse>> {
    let thumb_id = parse_id(&thumb_id, "Thumbnail")?;
    let favorite = state.service.toggle_favorite(&auth, thumb_id).await?;
    Ok(Json(FavoriteResponse { favorite }))
}
