use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewThumbnail, Thumbnail};
use crate::resolver::resolve;

const THUMBNAIL_COLUMNS: &str =
    "id, board_id, video_url, thumbnail_url, title, category, favorite, created_at";

impl super::Database {
    /// Insert a thumbnail; its image URL is derived from the video URL
    pub async fn add_thumbnail(&self, board_id: Uuid, new: &NewThumbnail) -> Result<Thumbnail> {
        let thumbnail_url = resolve(&new.video_url)?;

        sqlx::query_as::<_, Thumbnail>(&format!(
            r#"
            INSERT INTO thumbnails (id, board_id, video_url, thumbnail_url, title, category, favorite, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW())
            RETURNING {THUMBNAIL_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(board_id)
        .bind(&new.video_url)
        .bind(&thumbnail_url)
        .bind(&new.title)
        .bind(&new.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("thumbnails_board_id_fkey") {
                    return AppError::NotFound("Board not found".to_string());
                }
            }
            AppError::Database(e)
        })
    }

    /// Owner of the board a thumbnail belongs to
    pub async fn thumbnail_owner(&self, thumb_id: Uuid) -> Result<Uuid> {
        let (owner_id,): (Uuid,) = sqlx::query_as(
            r#"
            SELECT b.owner_id
            FROM thumbnails t
            JOIN boards b ON b.id = t.board_id
            WHERE t.id = $1
            "#,
        )
        .bind(thumb_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

        Ok(owner_id)
    }

    /// List a board's thumbnails in creation order
    pub async fn list_thumbnails(&self, board_id: Uuid) -> Result<Vec<Thumbnail>> {
        let thumbnails = sqlx::query_as::<_, Thumbnail>(&format!(
            "SELECT {THUMBNAIL_COLUMNS} FROM thumbnails WHERE board_id = $1 ORDER BY seq ASC"
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(thumbnails)
    }

    /// Delete a thumbnail
    pub async fn delete_thumbnail(&self, thumb_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM thumbnails WHERE id = $1")
            .bind(thumb_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Thumbnail not found".to_string()));
        }

        Ok(())
    }

    /// Flip the favorite flag in a single statement
    pub async fn toggle_favorite(&self, thumb_id: Uuid) -> Result<bool> {
        let (favorite,): (bool,) = sqlx::query_as(
            "UPDATE thumbnails SET favorite = NOT favorite WHERE id = $1 RETURNING favorite",
        )
        .bind(thumb_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

        Ok(favorite)
    }
}
