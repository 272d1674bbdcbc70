use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "general";

pub const MAX_VIDEO_URL_LENGTH: usize = 500;
pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_CATEGORY_LENGTH: usize = 100;

/// A saved video on a board
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Thumbnail {
    pub id: Uuid,
    pub board_id: Uuid,
    pub video_url: String,
    /// Derived from `video_url` at insertion, never updated
    pub thumbnail_url: String,
    pub title: String,
    pub category: String,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to add a thumbnail to a board
#[derive(Debug, Deserialize)]
pub struct AddThumbnailRequest {
    #[serde(default)]
    pub video_url: String,
    pub title: Option<String>,
    pub category: Option<String>,
}

/// Validated thumbnail input, before URL resolution
#[derive(Debug, Clone)]
pub struct NewThumbnail {
    pub video_url: String,
    pub title: String,
    pub category: String,
}

impl AddThumbnailRequest {
    pub fn validate(self) -> Result<NewThumbnail, String> {
        let video_url = self.video_url.trim();
        if video_url.is_empty() {
            return Err("Video URL required".to_string());
        }
        check_length("Video URL", video_url, MAX_VIDEO_URL_LENGTH)?;

        let title = or_default(self.title, DEFAULT_TITLE);
        check_length("Title", &title, MAX_TITLE_LENGTH)?;

        let category = or_default(self.category, DEFAULT_CATEGORY);
        check_length("Category", &category, MAX_CATEGORY_LENGTH)?;

        Ok(NewThumbnail {
            video_url: video_url.to_string(),
            title,
            category,
        })
    }
}

/// Missing or blank optional fields fall back to their default
fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.contains('\0') {
        return Err(format!("{} must not contain NUL characters", field));
    }
    if value.chars().count() > max {
        return Err(format!("{} must be {} characters or less", field, max));
    }
    Ok(())
}

/// Response after toggling a favorite
#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub favorite: bool,
}
