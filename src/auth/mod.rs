pub mod password;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use sha2::{Digest, Sha256};

use crate::{error::AppError, models::Principal, service::BoardService, AppState};

/// Prefix of every session token handed out by `/login`
pub const TOKEN_PREFIX: &str = "tb_";

/// Authenticated user extracted from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub principal: Principal,
    /// Raw bearer token, kept so the session can be ended on logout
    pub token: String,
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    BoardService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let service = BoardService::from_ref(state);

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                AppError::Unauthenticated("Missing or malformed Authorization header".to_string())
            })?;

        let token = bearer.token();
        if !token.starts_with(TOKEN_PREFIX) {
            return Err(AppError::Unauthenticated("Invalid token format".to_string()));
        }

        let principal = service.authenticate(token).await?;

        Ok(AuthenticatedUser {
            principal,
            token: token.to_string(),
        })
    }
}

impl FromRef<AppState> for BoardService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

/// Hash a session token for storage/lookup
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a new random session token
pub fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    format!("{}{}", TOKEN_PREFIX, hex::encode(bytes))
}
