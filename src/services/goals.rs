// SPDX-License-Identifier: MIT

//! Goal reconciliation engine.
//!
//! Maintains the heterogeneous goal list inside each daily document: typed
//! creation from a declared type tag, field-level partial updates, and the
//! zero-implies-prune lifecycle. The legacy system issued the zero-write and
//! the conditional removal as two separate store calls; here both land in a
//! single document write, closing the crash window between them while keeping
//! the distinct zeroed/removed outcomes.

use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::goal::{ExerciseGoal, NutritionGoal, WeightEntry, WeightGoal};
use crate::models::{DailyGoalDoc, GoalRecord, ZeroOutcome};
use crate::time_utils::now_rfc3339;

fn default_true() -> bool {
    true
}

/// Inbound payload for an exercise goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewExerciseGoal {
    #[serde(default)]
    exercise_id: Option<String>,
    goal_name: String,
    unit_type: String,
    goal_value: f64,
    #[serde(default)]
    progress_value: f64,
    #[serde(default)]
    comments: String,
    #[serde(default = "default_true")]
    is_active: bool,
}

/// Inbound payload for a nutrition goal (water/calorie/custom).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewNutritionGoal {
    goal_name: String,
    unit_type: String,
    goal_value: f64,
    #[serde(default)]
    progress_value: f64,
}

/// Inbound payload for a weight goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewWeightGoal {
    target_weight: f64,
    current_weight: f64,
    unit: String,
    #[serde(default)]
    entries: Vec<WeightEntry>,
}

/// Maintains goal lists inside per-user-per-date documents.
#[derive(Clone)]
pub struct GoalEngine {
    db: FirestoreDb,
}

impl GoalEngine {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create a goal from a declared type tag and append it to the date's
    /// list, creating the parent document if this is the first goal that day.
    pub async fn create(
        &self,
        user_id: &str,
        date: &str,
        type_tag: &str,
        payload: Value,
    ) -> Result<GoalRecord, AppError> {
        let record = self.build_record(user_id, type_tag, payload).await?;

        let mut doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .unwrap_or_else(|| DailyGoalDoc::new(user_id, date));
        doc.goals.push(record.clone());
        self.db.set_daily_goals(&doc).await?;

        tracing::debug!(user_id, date, goal_id = record.id(), "Goal created");
        Ok(record)
    }

    /// All goals for a date. A missing document is "not found", not an empty
    /// list.
    pub async fn list(&self, user_id: &str, date: &str) -> Result<Vec<GoalRecord>, AppError> {
        let doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound("No goals found for this date".to_string()))?;
        Ok(doc.goals)
    }

    /// Active goals for a date; not found when none qualify.
    pub async fn list_active(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Vec<GoalRecord>, AppError> {
        let not_found =
            || AppError::NotFound("No active goals found for this date".to_string());

        let doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .ok_or_else(not_found)?;

        let active: Vec<GoalRecord> = doc.goals.into_iter().filter(|g| g.is_active()).collect();
        if active.is_empty() {
            return Err(not_found());
        }
        Ok(active)
    }

    /// Get one goal by id.
    pub async fn get(
        &self,
        user_id: &str,
        date: &str,
        goal_id: &str,
    ) -> Result<GoalRecord, AppError> {
        let doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

        doc.find(goal_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))
    }

    /// Apply a field-level patch to one goal and stamp its update time.
    pub async fn update(
        &self,
        user_id: &str,
        date: &str,
        goal_id: &str,
        patch: &Map<String, Value>,
    ) -> Result<GoalRecord, AppError> {
        let mut doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

        let updated = doc
            .apply_patch(goal_id, patch)
            .map_err(|_| AppError::BadRequest("Invalid goal data".to_string()))?
            .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

        self.db.set_daily_goals(&doc).await?;
        tracing::debug!(user_id, date, goal_id, "Goal updated");
        Ok(updated)
    }

    /// Zero the goal value, pruning the record when its progress is already
    /// zero. The zeroed state is a valid terminal state of its own: the goal
    /// stays visible, parked at zero, until progress is cleared too.
    pub async fn clear_goal_value(
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

        match doc.clear_goal_value(goal_id) {
            ZeroOutcome::NotFound => Err(AppError::NotFound("Goal not found".to_string())),
            outcome => {
                self.db.set_daily_goals(&doc).await?;
                tracing::debug!(user_id, date, goal_id, ?outcome, "Goal value cleared");
                Ok(outcome)
            }
        }
    }

    /// Create-or-update keyed by goal name: the idempotent "log today's goal"
    /// entry point. Returns the record and whether it was newly created.
    pub async fn upsert_by_name(
        &self,
        user_id: &str,
        date: &str,
        goal_name: &str,
        type_tag: &str,
        payload: Value,
    ) -> Result<(GoalRecord, bool), AppError> {
        // Weight records carry no goal name, so a created one could never be
        // re-matched here and every call would append a duplicate. Only
        // name-carrying types are allowed through this entry point.
        if type_tag == "weight" {
            return Err(AppError::BadRequest("Unsupported goal type".to_string()));
        }

        let mut doc = self
            .db
            .get_daily_goals(user_id, date)
            .await?
            .unwrap_or_else(|| DailyGoalDoc::new(user_id, date));

        if let Some(existing) = doc.find_by_name(goal_name) {
            let goal_id = existing.id().to_string();
            let patch = as_object(payload)?;

            let updated = doc
                .apply_patch(&goal_id, &patch)
                .map_err(|_| AppError::BadRequest("Invalid goal data".to_string()))?
                .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

            self.db.set_daily_goals(&doc).await?;
            tracing::debug!(user_id, date, goal_name, "Goal upserted (update)");
            return Ok((updated, false));
        }

        // No record with that name yet: create one. The path name wins only
        // when the payload doesn't carry its own.
        let mut payload = as_object(payload)?;
        payload
            .entry("goalName".to_string())
            .or_insert_with(|| Value::String(goal_name.to_string()));

        let record = self
            .build_record(user_id, type_tag, Value::Object(payload))
            .await?;
        doc.goals.push(record.clone());
        self.db.set_daily_goals(&doc).await?;

        tracing::debug!(user_id, date, goal_name, "Goal upserted (create)");
        Ok((record, true))
    }

    /// Decode a payload into the variant named by the type tag, assigning a
    /// fresh id and timestamps.
    async fn build_record(
        &self,
        user_id: &str,
        type_tag: &str,
        payload: Value,
    ) -> Result<GoalRecord, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();

        match type_tag {
            "exercise" => {
                let input: NewExerciseGoal = serde_json::from_value(payload).map_err(|_| {
                    AppError::BadRequest("Invalid exercise goal data".to_string())
                })?;
                let exercise_id = self
                    .resolve_exercise_id(input.exercise_id.as_deref(), &input.goal_name)
                    .await?;

                Ok(GoalRecord::Exercise(ExerciseGoal {
                    id,
                    user_id: user_id.to_string(),
                    exercise_id,
                    goal_name: input.goal_name,
                    unit_type: input.unit_type,
                    goal_value: input.goal_value,
                    progress_value: input.progress_value,
                    comments: input.comments,
                    is_active: input.is_active,
                    created_at: now.clone(),
                    updated_at: now,
                }))
            }
            "water" | "calorie" | "customgoal" => {
                let input: NewNutritionGoal = serde_json::from_value(payload).map_err(|_| {
                    AppError::BadRequest("Invalid nutrition goal data".to_string())
                })?;

                Ok(GoalRecord::Nutrition(NutritionGoal {
                    id,
                    user_id: user_id.to_string(),
                    goal_name: input.goal_name,
                    unit_type: input.unit_type,
                    goal_value: input.goal_value,
                    progress_value: input.progress_value,
                    created_at: now.clone(),
                    updated_at: now,
                }))
            }
            "weight" => {
                let input: NewWeightGoal = serde_json::from_value(payload)
                    .map_err(|_| AppError::BadRequest("Invalid weight goal data".to_string()))?;

                Ok(GoalRecord::Weight(WeightGoal {
                    id,
                    user_id: user_id.to_string(),
                    target_weight: input.target_weight,
                    current_weight: input.current_weight,
                    unit: input.unit,
                    entries: input.entries,
                    created_at: now.clone(),
                    updated_at: now,
                }))
            }
            _ => Err(AppError::BadRequest("Invalid goal type".to_string())),
        }
    }

    /// Resolve the catalog reference for an exercise goal. When the client
    /// sends no id, the goal name is looked up in the catalog; an unknown
    /// name stores the empty sentinel rather than failing, so users can log
    /// exercises the catalog doesn't know yet.
    async fn resolve_exercise_id(
        &self,
        supplied: Option<&str>,
        goal_name: &str,
    ) -> Result<String, AppError> {
        if let Some(id) = supplied {
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }

        match self.db.get_exercise_by_name(goal_name).await? {
            Some(exercise) => Ok(exercise.id),
            None => {
                tracing::debug!(goal_name, "No catalog entry for goal name");
                Ok(String::new())
            }
        }
    }
}

fn as_object(payload: Value) -> Result<Map<String, Value>, AppError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest("Invalid goal data".to_string())),
    }
}
