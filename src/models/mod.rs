// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod exercise;
pub mod food;
pub mod goal;
pub mod user;

pub use exercise::Exercise;
pub use food::{FoodItem, FoodLogDoc};
pub use goal::{DailyGoalDoc, GoalRecord, ProgressTotals, ZeroOutcome};
pub use user::{User, UserResponse};
