// SPDX-License-Identifier: MIT

//! Daily goal routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{AppError, Message, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{GoalRecord, ZeroOutcome};
use crate::time_utils::parse_day;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/goals/{date}", post(create_goal).get(list_goals))
        .route("/api/goals/{date}/active", get(list_active_goals))
        .route(
            "/api/goals/{date}/{id}",
            get(get_goal).patch(update_goal).delete(delete_goal),
        )
        .route("/api/goals/{date}/name/{goal_name}", put(upsert_goal))
}

/// Create payload: a declared type tag plus the type-specific goal body.
#[derive(Debug, Deserialize)]
struct CreateGoalRequest {
    #[serde(rename = "type")]
    type_tag: String,
    goal: Value,
}

fn check_date(date: &str) -> Result<()> {
    parse_day(date)
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest("Invalid date format".to_string()))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    payload: std::result::Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalRecord>)> {
    check_date(&date)?;
    let Json(req) = payload?;
    let record = state
        .goals
        .create(&user.user_id, &date, &req.type_tag, req.goal)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<Vec<GoalRecord>>> {
    check_date(&date)?;
    Ok(Json(state.goals.list(&user.user_id, &date).await?))
}

async fn list_active_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<Vec<GoalRecord>>> {
    check_date(&date)?;
    Ok(Json(state.goals.list_active(&user.user_id, &date).await?))
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<GoalRecord>> {
    check_date(&date)?;
    Ok(Json(state.goals.get(&user.user_id, &date, &id).await?))
}

/// Partial update: only supplied fields change; id, owner, and kind are
/// immutable.
async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, id)): Path<(String, String)>,
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<GoalRecord>> {
    check_date(&date)?;
    let Json(patch) = payload?;
    let record = state
        .goals
        .update(&user.user_id, &date, &id, &patch)
        .await?;
    Ok(Json(record))
}

/// Zero the goal value. The record is pruned only when its progress is
/// already zero; otherwise it stays, parked at zero.
async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<Message>> {
    check_date(&date)?;
    match state
        .goals
        .clear_goal_value(&user.user_id, &date, &id)
        .await?
    {
        ZeroOutcome::Removed => Ok(Message::new("Goal deleted successfully")),
        _ => Ok(Message::new("Goal value set to 0")),
    }
}

/// Create-or-update keyed by goal name, the idempotent entry point clients
/// use to log "today's goal" without tracking ids.
async fn upsert_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((date, goal_name)): Path<(String, String)>,
    payload: std::result::Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalRecord>)> {
    check_date(&date)?;
    let Json(req) = payload?;
    let (record, created) = state
        .goals
        .upsert_by_name(&user.user_id, &date, &goal_name, &req.type_tag, req.goal)
        .await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(record)))
}
