mod boards;
mod memory;
mod thumbnails;
mod users;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Board, BoardWithCount, NewThumbnail, Thumbnail, User};

/// Persistence for users, sessions, boards and thumbnails.
///
/// Implementations must keep every thumbnail attached to a live board: board
/// deletion removes its thumbnails in the same atomic step, and an insert that
/// races a deletion either lands before it (and is removed with the board) or
/// fails with `NotFound`. `thumbnail_url` is always derived from `video_url`
/// via [`crate::resolver::resolve`] at insertion.
#[async_trait]
pub trait Store: Send + Sync {
    /// Readiness probe
    async fn ping(&self) -> Result<()>;

    /// Fails with `EmailTaken` if the email is already registered
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Removes the user with all of their boards, thumbnails and sessions
    async fn delete_user(&self, user_id: Uuid) -> Result<()>;

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
    /// Fails with `Unauthenticated` for unknown or expired sessions
    async fn get_session_user(&self, token_hash: &str) -> Result<User>;
    async fn delete_session(&self, token_hash: &str) -> Result<()>;

    /// Fails with `Validation` if the name is empty
    async fn create_board(&self, owner_id: Uuid, name: &str) -> Result<Board>;
    async fn get_board(&self, board_id: Uuid) -> Result<Board>;
    /// Boards owned by `owner_id` in creation order, with live thumbnail counts
    async fn list_boards(&self, owner_id: Uuid) -> Result<Vec<BoardWithCount>>;
    /// Removes the board and all its thumbnails atomically, returning how many
    /// thumbnails went with it
    async fn delete_board(&self, board_id: Uuid, owner_id: Uuid) -> Result<u64>;

    /// Fails with `InvalidUrl` if the video URL cannot be resolved and
    /// `NotFound` if the board is gone
    async fn add_thumbnail(&self, board_id: Uuid, new: &NewThumbnail) -> Result<Thumbnail>;
    /// Owner of the board the thumbnail belongs to
    async fn thumbnail_owner(&self, thumb_id: Uuid) -> Result<Uuid>;
    /// Thumbnails of a board in creation order
    async fn list_thumbnails(&self, board_id: Uuid) -> Result<Vec<Thumbnail>>;
    async fn delete_thumbnail(&self, thumb_id: Uuid) -> Result<()>;
    /// Flip `favorite` in one atomic step and return the new value
    async fn toggle_favorite(&self, thumb_id: Uuid) -> Result<bool>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for Database {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        Database::create_user(self, email, password_hash).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Database::get_user_by_email(self, email).await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        Database::delete_user(self, user_id).await
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        Database::create_session(self, user_id, token_hash, expires_at).await
    }

    async fn get_session_user(&self, token_hash: &str) -> Result<User> {
        Database::get_session_user(self, token_hash).await
    }

    async fn delete_session(&self, token_hash: &str) -> Result<()> {
        Database::delete_session(self, token_hash).await
    }

    async fn create_board(&self, owner_id: Uuid, name: &str) -> Result<Board> {
        Database::create_board(self, owner_id, name).await
    }

    async fn get_board(&self, board_id: Uuid) -> Result<Board> {
        Database::get_board(self, board_id).await
    }

    async fn list_boards(&self, owner_id: Uuid) -> Result<Vec<BoardWithCount>> {
        Database::list_boards(self, owner_id).await
    }

    async fn delete_board(&self, board_id: Uuid, owner_id: Uuid) -> Result<u64> {
        Database::delete_board(self, board_id, owner_id).await
    }

    async fn add_thumbnail(&self, board_id: Uuid, new: &NewThumbnail) -> Result<Thumbnail> {
        Database::add_thumbnail(self, board_id, new).await
    }

    async fn thumbnail_owner(&self, thumb_id: Uuid) -> Result<Uuid> {
        Database::thumbnail_owner(self, thumb_id).await
    }

    async fn list_thumbnails(&self, board_id: Uuid) -> Result<Vec<Thumbnail>> {
        Database::list_thumbnails(self, board_id).await
    }

    async fn delete_thumbnail(&self, thumb_id: Uuid) -> Result<()> {
        Database::delete_thumbnail(self, thumb_id).await
    }

    async fn toggle_favorite(&self, thumb_id: Uuid) -> Result<bool> {
        Database::toggle_favorite(self, thumb_id).await
    }
}
