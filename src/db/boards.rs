use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{validate_board_name, Board, BoardWithCount};

impl super::Database {
    /// Create a board owned by `owner_id`
    pub async fn create_board(&self, owner_id: Uuid, name: &str) -> Result<Board> {
        let name = validate_board_name(name).map_err(AppError::Validation)?;

        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (id, name, owner_id, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, name, owner_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(board)
    }

    /// Get a board by ID
    pub async fn get_board(&self, board_id: Uuid) -> Result<Board> {
        sqlx::query_as::<_, Board>(
            "SELECT id, name, owner_id, created_at FROM boards WHERE id = $1",
        )
        .bind(board_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".to_string()))
    }

    /// List an owner's boards with their thumbnail counts
    pub async fn list_boards(&self, owner_id: Uuid) -> Result<Vec<BoardWithCount>> {
        #[derive(sqlx::FromRow)]
        struct BoardRow {
            id: Uuid,
            name: String,
            owner_id: Uuid,
            created_at: chrono::DateTime<chrono::Utc>,
            thumbnail_count: Option<i64>,
        }

        let rows = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT
                b.id, b.name, b.owner_id, b.created_at,
                COUNT(t.id) AS thumbnail_count
            FROM boards b
            LEFT JOIN thumbnails t ON t.board_id = b.id
            WHERE b.owner_id = $1
            GROUP BY b.id
            ORDER BY b.seq ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                BoardWithCount::new(
                    Board {
                        id: r.id,
                        name: r.name,
                        owner_id: r.owner_id,
                        created_at: r.created_at,
                    },
                    r.thumbnail_count.unwrap_or(0),
                )
            })
            .collect())
    }

    /// Delete a board and its thumbnails in one transaction
    ///
    /// The board row is locked first, so a concurrent thumbnail insert (whose
    /// foreign key check needs a share lock on the same row) either commits
    /// before this and is removed here, or runs after and fails with NotFound.
    pub async fn delete_board(&self, board_id: Uuid, owner_id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let board: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM boards WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(board_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        if board.is_none() {
            return Err(AppError::NotFound("Board not found".to_string()));
        }

        let removed = sqlx::query("DELETE FROM thumbnails WHERE board_id = $1")
            .bind(board_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(board_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(removed)
    }
}
