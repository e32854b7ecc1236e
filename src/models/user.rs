// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User record stored in Firestore (document id = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique across users, enforced before insert
    pub email: String,
    pub name: String,
    /// bcrypt hash, never serialized into API responses
    pub password_hash: String,
    pub weight: f64,
    pub height: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// User profile as returned by the API: the stored record minus credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub weight: f64,
    pub height: f64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            weight: user.weight,
            height: user.height,
        }
    }
}
