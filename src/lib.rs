// SPDX-License-Identifier: MIT

//! Fitness-Backend: user accounts, daily goal tracking, food logging and an
//! exercise reference catalog over HTTP, backed by Firestore.
//!
//! The interesting part is the daily-goal document model: each user/date pair
//! owns one document holding a heterogeneous list of goal records, maintained
//! by the goal reconciliation engine in [`services::goals`].

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{food::FoodLog, goals::GoalEngine, progress::ProgressTracker};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub goals: GoalEngine,
    pub progress: ProgressTracker,
    pub food: FoodLog,
}

impl AppState {
    /// Build the state from a config and database handle.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        Self {
            goals: GoalEngine::new(db.clone()),
            progress: ProgressTracker::new(db.clone()),
            food: FoodLog::new(db.clone()),
            config,
            db,
        }
    }
}
