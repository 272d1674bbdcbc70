//! In-memory store for development and tests
//!
//! All state sits behind a single lock. Every mutation, including the board
//! cascade and the favorite toggle, runs entirely under one write guard, so
//! readers never observe a half-applied change.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::{AppError, Result};
use crate::models::{
    validate_board_name, Board, BoardWithCount, NewThumbnail, Session, Thumbnail, User,
};
use crate::resolver::resolve;

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    /// Creation order
    boards: Vec<Board>,
    /// Creation order
    thumbnails: Vec<Thumbnail>,
}

impl MemoryState {
    fn board(&self, board_id: Uuid) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    fn thumbnail_count(&self, board_id: Uuid) -> i64 {
        self.thumbnails.iter().filter(|t| t.board_id == board_id).count() as i64
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == email) {
            return Err(AppError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        if state.users.remove(&user_id).is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let owned: Vec<Uuid> = state
            .boards
            .iter()
            .filter(|b| b.owner_id == user_id)
            .map(|b| b.id)
            .collect();
        state.thumbnails.retain(|t| !owned.contains(&t.board_id));
        state.boards.retain(|b| b.owner_id != user_id);
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        state.sessions.retain(|_, s| s.expires_at > now);
        state.sessions.insert(
            token_hash.to_string(),
            Session {
                token_hash: token_hash.to_string(),
                user_id,
                created_at: now,
                expires_at,
            },
        );
        Ok(())
    }

    async fn get_session_user(&self, token_hash: &str) -> Result<User> {
        let mut state = self.state.write().await;
        let expired = state
            .sessions
            .get(token_hash)
            .is_some_and(|s| s.expires_at <= Utc::now());
        if expired {
            state.sessions.remove(token_hash);
        }

        let user = state
            .sessions
            .get(token_hash)
            .and_then(|s| state.users.get(&s.user_id))
            .cloned();
        user.ok_or_else(|| AppError::Unauthenticated("Invalid or expired token".to_string()))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<()> {
        self.state.write().await.sessions.remove(token_hash);
        Ok(())
    }

    async fn create_board(&self, owner_id: Uuid, name: &str) -> Result<Board> {
        let name = validate_board_name(name).map_err(AppError::Validation)?;

        let board = Board {
            id: Uuid::new_v4(),
            name: name.to_string(),
            owner_id,
            created_at: Utc::now(),
        };
        self.state.write().await.boards.push(board.clone());
        Ok(board)
    }

    async fn get_board(&self, board_id: Uuid) -> Result<Board> {
        let state = self.state.read().await;
        state
            .board(board_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Board not found".to_string()))
    }

    async fn list_boards(&self, owner_id: Uuid) -> Result<Vec<BoardWithCount>> {
        let state = self.state.read().await;
        Ok(state
            .boards
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .map(|b| BoardWithCount::new(b.clone(), state.thumbnail_count(b.id)))
            .collect())
    }

    async fn delete_board(&self, board_id: Uuid, owner_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let position = state
            .boards
            .iter()
            .position(|b| b.id == board_id && b.owner_id == owner_id)
            .ok_or_else(|| AppError::NotFound("Board not found".to_string()))?;

        let before = state.thumbnails.len();
        state.thumbnails.retain(|t| t.board_id != board_id);
        let removed = (before - state.thumbnails.len()) as u64;
        state.boards.remove(position);
        Ok(removed)
    }

    async fn add_thumbnail(&self, board_id: Uuid, new: &NewThumbnail) -> Result<Thumbnail> {
        let thumbnail_url = resolve(&new.video_url)?;

        let mut state = self.state.write().await;
        if state.board(board_id).is_none() {
            return Err(AppError::NotFound("Board not found".to_string()));
        }

        let thumbnail = Thumbnail {
            id: Uuid::new_v4(),
            board_id,
            video_url: new.video_url.clone(),
            thumbnail_url,
            title: new.title.clone(),
            category: new.category.clone(),
            favorite: false,
            created_at: Utc::now(),
        };
        state.thumbnails.push(thumbnail.clone());
        Ok(thumbnail)
    }

    async fn thumbnail_owner(&self, thumb_id: Uuid) -> Result<Uuid> {
        let state = self.state.read().await;
        state
            .thumbnails
            .iter()
            .find(|t| t.id == thumb_id)
            .and_then(|t| state.board(t.board_id))
            .map(|b| b.owner_id)
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))
    }

    async fn list_thumbnails(&self, board_id: Uuid) -> Result<Vec<Thumbnail>> {
        let state = self.state.read().await;
        Ok(state
            .thumbnails
            .iter()
            .filter(|t| t.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn delete_thumbnail(&self, thumb_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let position = state
            .thumbnails
            .iter()
            .position(|t| t.id == thumb_id)
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;
        state.thumbnails.remove(position);
        Ok(())
    }

    async fn toggle_favorite(&self, thumb_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let thumbnail = state
            .thumbnails
            .iter_mut()
            .find(|t| t.id == thumb_id)
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;
        thumbnail.favorite = !thumbnail.favorite;
        Ok(thumbnail.favorite)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_thumbnail(video_url: &str) -> NewThumbnail {
        NewThumbnail {
            video_url: video_url.to_string(),
            title: "Untitled".to_string(),
            category: "general".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let board = store.create_board(owner, "Music").await.unwrap();
        let other = store.create_board(owner, "Talks").await.unwrap();

        for id in ["a1", "b2", "c3"] {
            store
                .add_thumbnail(board.id, &new_thumbnail(&format!("https://youtu.be/{id}")))
                .await
                .unwrap();
        }
        let kept = store
            .add_thumbnail(other.id, &new_thumbnail("https://youtu.be/keep"))
            .await
            .unwrap();

        assert_eq!(store.delete_board(board.id, owner).await.unwrap(), 3);
        assert!(store.list_thumbnails(board.id).await.unwrap().is_empty());
        assert!(matches!(store.get_board(board.id).await, Err(AppError::NotFound(_))));

        let remaining = store.list_thumbnails(other.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_delete_board_requires_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let board = store.create_board(owner, "Music").await.unwrap();

        let result = store.delete_board(board.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.get_board(board.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_thumbnail_to_missing_board() {
        let store = MemoryStore::new();
        let result = store
            .add_thumbnail(Uuid::new_v4(), &new_thumbnail("https://youtu.be/abc"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_board_rejects_empty_name() {
        let store = MemoryStore::new();
        let result = store.create_board(Uuid::new_v4(), "  ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_thumbnails_in_creation_order() {
        let store = MemoryStore::new();
        let board = store.create_board(Uuid::new_v4(), "Music").await.unwrap();
        for id in ["first", "second", "third"] {
            store
                .add_thumbnail(board.id, &new_thumbnail(&format!("https://youtu.be/{id}")))
                .await
                .unwrap();
        }

        let urls: Vec<_> = store
            .list_thumbnails(board.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.video_url)
            .collect();
        assert_eq!(
            urls,
            ["https://youtu.be/first", "https://youtu.be/second", "https://youtu.be/third"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_toggles_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let board = store.create_board(Uuid::new_v4(), "Music").await.unwrap();
        let thumb = store
            .add_thumbnail(board.id, &new_thumbnail("https://youtu.be/abc"))
            .await
            .unwrap();

        let thumb_id = thumb.id;
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.toggle_favorite(thumb_id).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // An even number of toggles lands back on the starting value
        let thumbs = store.list_thumbnails(board.id).await.unwrap();
        assert!(!thumbs[0].favorite);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash").await.unwrap();
        let board = store.create_board(user.id, "Music").await.unwrap();
        store
            .add_thumbnail(board.id, &new_thumbnail("https://youtu.be/abc"))
            .await
            .unwrap();
        store
            .create_session(user.id, "tokenhash", Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();

        store.delete_user(user.id).await.unwrap();

        assert!(store.list_boards(user.id).await.unwrap().is_empty());
        assert!(store.list_thumbnails(board.id).await.unwrap().is_empty());
        assert!(matches!(
            store.get_session_user("tokenhash").await,
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let store = MemoryStore::new();
        let user = store.create_user("a@example.com", "hash").await.unwrap();
        store
            .create_session(user.id, "old", Utc::now() - chrono::Duration::seconds(1))
            .await
            .unwrap();

        assert!(matches!(
            store.get_session_user("old").await,
            Err(AppError::Unauthenticated(_))
        ));
        assert!(store.state.read().await.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_login_purges_other_users_expired_sessions() {
        let store = MemoryStore::new();
        let idle = store.create_user("idle@example.com", "hash").await.unwrap();
        let active = store.create_user("active@example.com", "hash").await.unwrap();
        store
            .create_session(idle.id, "stale", Utc::now() - chrono::Duration::seconds(1))
            .await
            .unwrap();

        store
            .create_session(active.id, "fresh", Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();

        let state = store.state.read().await;
        assert!(!state.sessions.contains_key("stale"));
        assert!(state.sessions.contains_key("fresh"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delete_board_racing_adds_leaves_no_orphans() {
        let store = Arc::new(MemoryStore::new());
        let owner = Uuid::new_v4();

        for round in 0..20 {
            let board = store.create_board(owner, "Music").await.unwrap();
            let board_id = board.id;

            let adds: Vec<_> = (0..20)
                .map(|i| {
                    let store = store.clone();
                    let video = new_thumbnail(&format!("https://youtu.be/r{round}v{i}"));
                    tokio::spawn(async move { store.add_thumbnail(board_id, &video).await })
                })
                .collect();
            let delete = {
                let store = store.clone();
                tokio::spawn(async move { store.delete_board(board_id, owner).await })
            };

            let removed = delete.await.unwrap().unwrap();
            let mut landed = 0u64;
            for add in adds {
                match add.await.unwrap() {
                    Ok(_) => landed += 1,
                    Err(AppError::NotFound(_)) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }

            // Every insert that succeeded went before the delete and was cascaded
            assert_eq!(removed, landed);
            assert!(store.list_thumbnails(board_id).await.unwrap().is_empty());
            assert!(store.get_board(board_id).await.is_err());
        }
        assert!(store.state.read().await.thumbnails.is_empty());
    }
}
