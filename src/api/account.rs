use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    auth::AuthenticatedUser,
    error::Result,
    models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    AppState,
};

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;
    let user = state.service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Exchange email + password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;
    let session = state.service.login(req).await?;
    Ok(Json(session))
}

/// End the current session
pub async fn logout(State(state): State<AppState>, auth: AuthenticatedUser) -> Result<Json<Value>> {
    state.service.logout(&auth.token).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}

/// Delete the authenticated account and everything it owns
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Value>> {
    state.service.delete_account(&auth).await?;
    Ok(Json(json!({ "message": "Account deleted" })))
}
