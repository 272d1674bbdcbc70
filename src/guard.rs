//! Board ownership checks
//!
//! A principal may act on a board only if it owns it. Thumbnails have no owner
//! of their own and are authorized through their parent board. Denials are
//! reported to clients exactly like a missing resource.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Board, Principal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

impl Access {
    /// Fold a denial into `NotFound` so other users' boards are indistinguishable
    /// from boards that do not exist
    pub fn or_not_found(self, what: &str) -> Result<()> {
        match self {
            Access::Allowed => Ok(()),
            Access::Denied => Err(AppError::NotFound(format!("{} not found", what))),
        }
    }
}

/// Check whether `principal` owns `board`
pub fn authorize(principal: &Principal, board: &Board) -> Access {
    authorize_owner(principal, board.owner_id)
}

/// Check a principal against an owner id (used for thumbnails via their board)
pub fn authorize_owner(principal: &Principal, owner_id: Uuid) -> Access {
    if principal.id == owner_id {
        Access::Allowed
    } else {
        Access::Denied
    }
}
