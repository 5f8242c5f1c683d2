use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::error::ApiError;
use crate::models::{Member, MemberCreate};
use crate::validation::{validate_email, validate_required_text};
use crate::AppState;

// GET /clubs/:clubId/members - List a club's members
//
// An unknown club or a club without recorded members returns [], not an
// error. Callers needing existence validation hit GET /clubs/:clubId first.
pub async fn list_members(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = state.store.list_members(club_id).await;

    Ok(Json(members))
}

// POST /clubs/:clubId/members - Add a member to a club
pub async fn add_member(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
    Json(payload): Json<MemberCreate>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    validate_required_text(&payload.name, "name")?;
    validate_email(&payload.email)?;

    let member = state
        .store
        .add_member(club_id, payload)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Club {} not found", club_id)))?;

    tracing::info!(club_id, member_id = member.id, "Member added");

    Ok((StatusCode::CREATED, Json(member)))
}

// DELETE /clubs/:clubId/members/:memberId - Remove a member from a club
pub async fn remove_member(
    State(state): State<AppState>,
    Path((club_id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    if !state.store.remove_member(club_id, member_id).await {
        return Err(ApiError::not_found(format!(
            "Member {} not found in club {}",
            member_id, club_id
        )));
    }

    tracing::info!(club_id, member_id, "Member removed");

    Ok(StatusCode::NO_CONTENT)
}
