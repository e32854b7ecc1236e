// SPDX-License-Identifier: MIT

//! Progress aggregation and update routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Message, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ProgressTotals, ZeroOutcome};
use crate::time_utils::parse_day;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    // GET takes a date, PATCH a goal id; they share one template because
    // the router cannot register the same position under two param names.
    Router::new()
        .route(
            "/api/progress/{date}",
            get(get_progress).patch(update_progress),
        )
        .route("/api/progress/{date}/{id}", delete(reset_progress))
}

fn check_date(date: &str) -> Result<()> {
    parse_day(date)
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest("Invalid date format".to_string()))
}

/// Summed progress and goal values for a date, excluding goals parked at
/// zero.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<ProgressTotals>> {
    check_date(&date)?;
    Ok(Json(state.progress.sum(&user.user_id, &date).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProgressRequest {
    progress_value: f64,
}

/// Set the progress value on a goal matched by id alone.
async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateProgressRequest>, JsonRejection>,
) -> Result<Json<Message>> {
    let Json(req) = payload?;
    state
        .progress
        .set_progress(&user.user_id, &id, req.progress_value)
        .await?;
    Ok(Message::new("Progress updated successfully"))
}

/// Zero the progress value, pruning the record when its goal value is
/// already zero.
async fn reset_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<Message>> {
    check_date(&date)?;
    match state
        .progress
        .reset_progress(&user.user_id, &date, &id)
        .await?
    {
        ZeroOutcome::Removed => Ok(Message::new("Goal deleted successfully")),
        _ => Ok(Message::new("Progress set to 0")),
    }
}
