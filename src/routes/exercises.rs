// SPDX-License-Identifier: MIT

//! Exercise reference catalog routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Message, Result};
use crate::models::exercise::NewExercise;
use crate::models::Exercise;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/api/exercises/category/{category}",
            get(list_by_category),
        )
        .route(
            "/api/exercises/{id}",
            get(get_exercise).delete(delete_exercise),
        )
}

/// List the whole catalog.
async fn list_exercises(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Exercise>>> {
    Ok(Json(state.db.list_exercises().await?))
}

/// List catalog entries in one category; an unknown category is a 404.
async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Exercise>>> {
    let exercises = state.db.list_exercises_by_category(&category).await?;
    if exercises.is_empty() {
        return Err(AppError::NotFound(
            "No exercises found for this category".to_string(),
        ));
    }
    Ok(Json(exercises))
}

/// Get one catalog entry.
async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>> {
    let exercise = state
        .db
        .get_exercise(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;
    Ok(Json(exercise))
}

/// Add a catalog entry. All fields are required.
async fn create_exercise(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewExercise>, JsonRejection>,
) -> Result<(StatusCode, Json<Exercise>)> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let exercise = req.into_exercise(Uuid::new_v4().to_string());
    state.db.insert_exercise(&exercise).await?;
    tracing::info!(exercise_id = %exercise.id, name = %exercise.name, "Catalog entry created");

    Ok((StatusCode::CREATED, Json(exercise)))
}

/// Remove a catalog entry.
async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    if !state.db.delete_exercise(&id).await? {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }
    Ok(Message::new("Exercise deleted successfully"))
}
