mod account;
mod boards;
mod thumbnails;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    AppState,
};

/// Build the API router
pub fn router() -> Router<AppState> {
    Router::new()
        // Account routes
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/account", delete(account::delete_account))
        // Board routes (scoped to the authenticated owner)
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route("/boards/{board_id}", delete(boards::delete_board))
        .route(
            "/boards/{board_id}/thumbnails",
            get(thumbnails::list_thumbnails).post(thumbnails::add_thumbnail),
        )
        // Thumbnail routes (authorized through the parent board)
        .route("/thumbnails/{thumb_id}", delete(thumbnails::delete_thumbnail))
        .route("/thumbnails/{thumb_id}/favorite", patch(thumbnails::toggle_favorite))
}

/// Parse a path id; anything that is not a UUID cannot name an existing resource
fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{} not found", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Board").unwrap(), id);
        assert!(matches!(
            parse_id("507f1f77bcf86cd799439011", "Board"),
            Err(AppError::NotFound(msg)) if msg == "Board not found"
        ));
    }
}
