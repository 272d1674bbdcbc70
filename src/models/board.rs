use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum board name length
pub const MAX_BOARD_NAME_LENGTH: usize = 255;

/// A named collection of thumbnails owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Board with its live thumbnail count
#[derive(Debug, Clone, Serialize)]
pub struct BoardWithCount {
    pub id: Uuid,
    pub name: String,
    pub thumbnail_count: i64,
    pub created_at: DateTime<Utc>,
}

impl BoardWithCount {
    pub fn new(board: Board, thumbnail_count: i64) -> Self {
        Self {
            id: board.id,
            name: board.name,
            thumbnail_count,
            created_at: board.created_at,
        }
    }
}

/// Request to create a board
#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    #[serde(default)]
    pub name: String,
}

impl CreateBoardRequest {
    /// Returns the trimmed board name
    pub fn validate(self) -> Result<String, String> {
        validate_board_name(&self.name).map(str::to_string)
    }
}

/// Validate a board name, returning it trimmed
pub fn validate_board_name(name: &str) -> Result<&str, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Board name required".to_string());
    }
    if name.contains('\0') {
        return Err("Board name must not contain NUL characters".to_string());
    }
    if name.chars().count() > MAX_BOARD_NAME_LENGTH {
        return Err(format!(
            "Board name must be {} characters or less",
            MAX_BOARD_NAME_LENGTH
        ));
    }
    Ok(name)
}
