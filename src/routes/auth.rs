use axum::{extract::State, http::StatusCode, response::Json};

use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserInfo};
use crate::AppState;

// POST /auth/register - Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let user = state.auth.register(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// POST /token - Verify credentials and issue a bearer token
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.login(payload).await?;

    Ok(Json(token))
}
