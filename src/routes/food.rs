// SPDX-License-Identifier: MIT

//! Food log routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use std::sync::Arc;

use crate::error::{Message, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FoodItem, FoodLogDoc};
use crate::services::food::NewFoodItem;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/food", get(get_food_log).post(log_food))
        .route("/api/food/{id}", delete(delete_food))
}

async fn log_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<NewFoodItem>, JsonRejection>,
) -> Result<(StatusCode, Json<FoodItem>)> {
    let Json(req) = payload?;
    let item = state.food.append(&user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// The full food log; an empty log rather than a 404 when nothing has been
/// logged yet.
async fn get_food_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FoodLogDoc>> {
    Ok(Json(state.food.list(&user.user_id).await?))
}

async fn delete_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    state.food.remove(&user.user_id, &id).await?;
    Ok(Message::new("Food item deleted successfully"))
}
