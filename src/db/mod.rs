// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const EXERCISE_GUIDES: &str = "exercise_guides";
    /// Per-user-per-date goal documents (doc id `{user_id}_{date}`)
    pub const DAILY_GOALS: &str = "daily_goals";
    /// Per-user food log documents (doc id = user id)
    pub const FOOD_LOGS: &str = "food_logs";
}
