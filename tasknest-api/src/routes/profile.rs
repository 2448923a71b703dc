/// Profile endpoints for the authenticated user
///
/// # Endpoints
///
/// - `GET /api/profile` - the caller's own record
/// - `PUT /api/profile` - update name and/or email
///
/// The authenticated identity comes from the gate's request extension;
/// responses are always the sanitized projection.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tasknest_shared::models::user::{PublicUser, UpdateProfile, User};

/// Profile update request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Returns the caller's profile
///
/// Re-reads the record so a concurrent deletion shows up as 404 rather
/// than a stale echo of the gate's copy.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<PublicUser>,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_public(&state.db, current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates the caller's name and/or email
///
/// A blank value is treated as absent. Changing the email to one
/// already registered trips the unique index and surfaces as the
/// duplicate-email error.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<PublicUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<PublicUser>> {
    let updates = UpdateProfile {
        name: req.name.filter(|n| !n.trim().is_empty()),
        email: req.email.filter(|e| !e.trim().is_empty()),
    };

    let user = User::update_profile(&state.db, current.id, updates)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %current.id, "Profile updated");

    Ok(Json(user.into()))
}
