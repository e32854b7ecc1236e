// SPDX-License-Identifier: MIT

//! Profile routes for the authenticated user.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/me", get(get_me).patch(update_me))
}

/// Get the current user's profile. The password hash never leaves the store.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(profile)))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    name: Option<String>,
    weight: Option<f64>,
    height: Option<f64>,
}

/// Update profile fields. Only supplied fields are touched.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = payload?;
    if req.name.is_none() && req.weight.is_none() && req.height.is_none() {
        return Err(AppError::BadRequest("No valid fields to update".to_string()));
    }

    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(name) = req.name {
        profile.name = name;
    }
    if let Some(weight) = req.weight {
        profile.weight = weight;
    }
    if let Some(height) = req.height {
        profile.height = height;
    }
    profile.updated_at = now_rfc3339();

    state.db.upsert_user(&profile).await?;
    tracing::debug!(user_id = %user.user_id, "Profile updated");

    Ok(Json(UserResponse::from(profile)))
}
