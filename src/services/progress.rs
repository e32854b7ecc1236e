// SPDX-License-Identifier: MIT

//! Progress aggregation over the daily goal lists.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ProgressTotals, ZeroOutcome};

/// Sums and updates progress across a user's goal documents.
#[derive(Clone)]
pub struct ProgressTracker {
    db: FirestoreDb,
}

impl ProgressTracker {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Total progress and goal values for a date, excluding goals parked at
    /// zero. A missing document is "not found", not zero totals.
    pub async fn sum(&self, user_id: &str, date: &str) -> Result<ProgressTotals, AppError> {
        let doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound("No progress found for this date".to_string()))?;

        Ok(doc.progress_totals())
    }

    /// Set the progress value on a goal matched by id alone, whatever date
    /// it lives under.
    pub async fn set_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        value: f64,
    ) -> Result<(), AppError> {
        let docs = self.db.list_daily_goals_for_user(user_id).await?;

        for mut doc in docs {
            if doc.set_progress_value(goal_id, value) {
                self.db.set_daily_goals(&doc).await?;
                tracing::debug!(user_id, goal_id, value, "Progress updated");
                return Ok(());
            }
        }

        Err(AppError::NotFound("Goal not found".to_string()))
    }

    /// Zero the progress value, pruning the record when its goal value is
    /// already zero. Mirrors the goal-side clear in the reconciliation
    /// engine.
    pub async fn reset_progress(
        &self,
        user_id: &str,
        date: &str,
        goal_id: &str,
    ) -> Result<ZeroOutcome, AppError> {
        let mut doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

        match doc.clear_progress_value(goal_id) {
            ZeroOutcome::NotFound => Err(AppError::NotFound("Goal not found".to_string())),
            outcome => {
                self.db.set_daily_goals(&doc).await?;
                tracing::debug!(user_id, date, goal_id, ?outcome, "Progress cleared");
                Ok(outcome)
            }
        }
    }
}
