// SPDX-License-Identifier: MIT

//! Signup and login routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::User;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account. Email uniqueness is enforced before insert;
/// a duplicate answers 409 and creates nothing.
async fn signup(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if state.db.get_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(req.password).await?;
    let now = now_rfc3339();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email,
        name: req.name,
        password_hash,
        weight: req.weight,
        height: req.height,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    let token = create_jwt(&user.id, &state.config.jwt_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Exchange credentials for a session token. Unknown email and wrong
/// password are indistinguishable to the caller.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(req) = payload?;

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .db
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = create_jwt(&user.id, &state.config.jwt_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok(Json(TokenResponse { token }))
}

/// bcrypt is deliberately slow; keep it off the async worker threads.
async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password verification failed: {}", e)))
}
