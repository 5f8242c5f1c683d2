use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::error::ApiError;
use crate::models::{Club, ClubCreate, ClubUpdate};
use crate::validation::{validate_member_count, validate_required_text};
use crate::AppState;

// GET /clubs - List all clubs
pub async fn list_clubs(State(state): State<AppState>) -> Result<Json<Vec<Club>>, ApiError> {
    let clubs = state.store.list_clubs().await;

    Ok(Json(clubs))
}

// POST /clubs - Create a club
pub async fn create_club(
    State(state): State<AppState>,
    Json(payload): Json<ClubCreate>,
) -> Result<(StatusCode, Json<Club>), ApiError> {
    validate_required_text(&payload.name, "name")?;
    validate_required_text(&payload.description, "description")?;
    validate_required_text(&payload.favorite_genre, "favorite_genre")?;
    validate_member_count(payload.members)?;

    let club = state.store.create_club(payload).await;

    tracing::info!(club_id = club.id, name = %club.name, "Club created");

    Ok((StatusCode::CREATED, Json(club)))
}

// GET /clubs/:clubId - Get club by ID
pub async fn get_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<Club>, ApiError> {
    let club = state
        .store
        .get_club(club_id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Club {} not found", club_id)))?;

    Ok(Json(club))
}

// PUT /clubs/:clubId - Partially update a club
pub async fn update_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Json(payload): Json<ClubUpdate>,
) -> Result<Json<Club>, ApiError> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name")?;
    }
    if let Some(description) = &payload.description {
        validate_required_text(description, "description")?;
    }
    if let Some(favorite_genre) = &payload.favorite_genre {
        validate_required_text(favorite_genre, "favorite_genre")?;
    }
    if let Some(members) = payload.members {
        validate_member_count(members)?;
    }

    let club = state
        .store
        .update_club(club_id, payload)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Club {} not found", club_id)))?;

    tracing::info!(club_id = club.id, "Club updated");

    Ok(Json(club))
}

// DELETE /clubs/:clubId - Delete a club and cascade its member list
pub async fn delete_club(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_club(club_id).await {
        return Err(ApiError::not_found(format!("Club {} not found", club_id)));
    }

    tracing::info!(club_id, "Club deleted");

    Ok(StatusCode::NO_CONTENT)
}
