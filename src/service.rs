//! Board and thumbnail operations
//!
//! Every operation validates its input before touching the store and checks
//! board ownership through [`crate::guard`]. Thumbnails are authorized through
//! the owner of their parent board.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{generate_token, hash_token, password};
use crate::config::AuthConfig;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::guard::{authorize, authorize_owner};
use crate::models::{
    AddThumbnailRequest, Board, BoardWithCount, CreateBoardRequest, LoginRequest, LoginResponse,
    Principal, RegisterRequest, Thumbnail, User,
};

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn Store>,
    auth: AuthConfig,
}

impl BoardService {
    pub fn new(store: Arc<dyn Store>, auth: AuthConfig) -> Self {
        Self { store, auth }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Register a new account
    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        let creds = req
            .validate(self.auth.min_password_length)
            .map_err(AppError::Validation)?;

        let password = creds.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| anyhow!("Password hashing task failed: {}", e))?
            .map_err(|e| anyhow!("Password hashing failed: {}", e))?;

        let user = self.store.create_user(&creds.email, &password_hash).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and start a session
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        let creds = req.validate().map_err(AppError::Validation)?;

        let user = self.store.get_user_by_email(&creds.email).await?;

        // Unknown emails still pay for one verification so timing does not
        // reveal which accounts exist
        let password = creds.password;
        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => password::dummy_hash().to_string(),
        };
        let outcome =
            tokio::task::spawn_blocking(move || password::verify_password(&password, &stored_hash))
                .await
                .map_err(|e| anyhow!("Password verification task failed: {}", e))?;

        let Some(user) = user else {
            return Err(AppError::InvalidCredentials);
        };
        let verified =
            outcome.map_err(|e| anyhow!("Stored password hash is unreadable: {}", e))?;
        if !verified {
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token();
        let expires_at = Duration::try_hours(self.auth.session_ttl_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                anyhow!("Session TTL of {}h is out of range", self.auth.session_ttl_hours)
            })?;
        self.store
            .create_session(user.id, &hash_token(&token), expires_at)
            .await?;

        tracing::debug!(user_id = %user.id, "Session started");
        Ok(LoginResponse { token, expires_at })
    }

    /// Resolve a bearer token to the principal it was issued to
    pub async fn authenticate(&self, token: &str) -> Result<Principal> {
        let user = self.store.get_session_user(&hash_token(token)).await?;
        Ok(Principal::from(&user))
    }

    /// End the session belonging to `token`
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.store.delete_session(&hash_token(token)).await
    }

    /// Delete the principal's account with all of its boards and thumbnails
    pub async fn delete_account(&self, principal: &Principal) -> Result<()> {
        self.store.delete_user(principal.id).await?;
        tracing::info!(user_id = %principal.id, "Account deleted");
        Ok(())
    }

    pub async fn list_boards(&self, principal: &Principal) -> Result<Vec<BoardWithCount>> {
        self.store.list_boards(principal.id).await
    }

    pub async fn create_board(&self, principal: &Principal, req: CreateBoardRequest) -> Result<Board> {
        let name = req.validate().map_err(AppError::Validation)?;
        let board = self.store.create_board(principal.id, &name).await?;
        tracing::info!(board_id = %board.id, owner_id = %principal.id, "Board created");
        Ok(board)
    }

    pub async fn delete_board(&self, principal: &Principal, board_id: Uuid) -> Result<()> {
        self.owned_board(principal, board_id).await?;
        let removed = self.store.delete_board(board_id, principal.id).await?;
        tracing::info!(%board_id, thumbnails = removed, "Board deleted");
        Ok(())
    }

    pub async fn list_thumbnails(&self, principal: &Principal, board_id: Uuid) -> Result<Vec<Thumbnail>> {
        self.owned_board(principal, board_id).await?;
        self.store.list_thumbnails(board_id).await
    }

    pub async fn add_thumbnail(
        &self,
        principal: &Principal,
        board_id: Uuid,
        req: AddThumbnailRequest,
    ) -> Result<Thumbnail> {
        let new = req.validate().map_err(AppError::Validation)?;
        self.owned_board(principal, board_id).await?;
        self.store.add_thumbnail(board_id, &new).await
    }

    pub async fn delete_thumbnail(&self, principal: &Principal, thumb_id: Uuid) -> Result<()> {
        self.owned_thumbnail(principal, thumb_id).await?;
        self.store.delete_thumbnail(thumb_id).await
    }

    /// Flip the favorite flag, returning the new value
    pub async fn toggle_favorite(&self, principal: &Principal, thumb_id: Uuid) -> Result<bool> {
        self.owned_thumbnail(principal, thumb_id).await?;
        self.store.toggle_favorite(thumb_id).await
    }

    async fn owned_board(&self, principal: &Principal, board_id: Uuid) -> Result<Board> {
        let board = self.store.get_board(board_id).await?;
        authorize(principal, &board).or_not_found("Board")?;
        Ok(board)
    }

    async fn owned_thumbnail(&self, principal: &Principal, thumb_id: Uuid) -> Result<()> {
        let owner_id = self.store.thumbnail_owner(thumb_id).await?;
        authorize_owner(principal, owner_id).or_not_found("Thumbnail")
    }
}
