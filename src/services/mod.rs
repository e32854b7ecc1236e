// SPDX-License-Identifier: MIT

//! Domain services: goal reconciliation, progress aggregation, food logging.

pub mod food;
pub mod goals;
pub mod progress;

pub use food::FoodLog;
pub use goals::GoalEngine;
pub use progress::ProgressTracker;
