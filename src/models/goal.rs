// SPDX-License-Identifier: MIT

//! Daily goal document model.
//!
//! One document per user per calendar day holds a heterogeneous list of goal
//! records. New writes carry an explicit `kind` discriminator; records without
//! one (written before the discriminator existed) are decoded by structural
//! probing in a fixed priority order: exercise, then nutrition, then weight.
//!
//! The reconciliation helpers here are pure in-memory operations; the
//! persistence around them lives in [`crate::services::goals`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::time_utils::now_rfc3339;

fn default_true() -> bool {
    true
}

/// A goal tied to a catalog exercise (reps/mins/kms against a target).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseGoal {
    pub id: String,
    pub user_id: String,
    /// Catalog exercise id. Empty string when the name lookup at creation
    /// found no match.
    pub exercise_id: String,
    pub goal_name: String,
    /// "reps", "mins" or "kms"
    pub unit_type: String,
    pub goal_value: f64,
    pub progress_value: f64,
    #[serde(default)]
    pub comments: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A nutrition goal: "water", "calorie", or any user-defined custom name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGoal {
    pub id: String,
    pub user_id: String,
    pub goal_name: String,
    pub unit_type: String,
    pub goal_value: f64,
    pub progress_value: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// A body-weight goal with its history of recorded weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightGoal {
    pub id: String,
    pub user_id: String,
    pub target_weight: f64,
    pub current_weight: f64,
    pub unit: String,
    #[serde(default)]
    pub entries: Vec<WeightEntry>,
    pub created_at: String,
    pub updated_at: String,
}

/// One historical weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub value: f64,
    pub date: String,
}

/// One entry in a day's goal list.
///
/// Serialized with a `kind` tag so stored records are self-describing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GoalRecord {
    Exercise(ExerciseGoal),
    Nutrition(NutritionGoal),
    Weight(WeightGoal),
}

impl GoalRecord {
    /// Decode a stored record. Uses the `kind` tag when present, otherwise
    /// probes each shape in priority order. Probing succeeds only when every
    /// required field of the shape is present, so the exercise-first order
    /// matters: exercise records are a superset of nutrition records.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        if let Some(kind) = value.get("kind").and_then(Value::as_str) {
            return match kind {
                "exercise" => serde_json::from_value(value.clone())
                    .map(GoalRecord::Exercise)
                    .map_err(|e| e.to_string()),
                "nutrition" => serde_json::from_value(value.clone())
                    .map(GoalRecord::Nutrition)
                    .map_err(|e| e.to_string()),
                "weight" => serde_json::from_value(value.clone())
                    .map(GoalRecord::Weight)
                    .map_err(|e| e.to_string()),
                other => Err(format!("unknown goal kind: {}", other)),
            };
        }

        if let Ok(goal) = serde_json::from_value::<ExerciseGoal>(value.clone()) {
            return Ok(GoalRecord::Exercise(goal));
        }
        if let Ok(goal) = serde_json::from_value::<NutritionGoal>(value.clone()) {
            return Ok(GoalRecord::Nutrition(goal));
        }
        if let Ok(goal) = serde_json::from_value::<WeightGoal>(value.clone()) {
            return Ok(GoalRecord::Weight(goal));
        }

        Err("record matches no known goal shape".to_string())
    }

    pub fn id(&self) -> &str {
        match self {
            GoalRecord::Exercise(g) => &g.id,
            GoalRecord::Nutrition(g) => &g.id,
            GoalRecord::Weight(g) => &g.id,
        }
    }

    /// Goal name, where the variant has one. Weight goals are keyed by their
    /// owner alone and are never matched by name.
    pub fn goal_name(&self) -> Option<&str> {
        match self {
            GoalRecord::Exercise(g) => Some(&g.goal_name),
            GoalRecord::Nutrition(g) => Some(&g.goal_name),
            GoalRecord::Weight(_) => None,
        }
    }

    /// The (goal, progress) value pair, for variants that track one.
    pub fn values(&self) -> Option<(f64, f64)> {
        match self {
            GoalRecord::Exercise(g) => Some((g.goal_value, g.progress_value)),
            GoalRecord::Nutrition(g) => Some((g.goal_value, g.progress_value)),
            GoalRecord::Weight(_) => None,
        }
    }

    /// Whether the record counts as active. Only exercise goals carry an
    /// explicit flag; other variants are always active.
    pub fn is_active(&self) -> bool {
        match self {
            GoalRecord::Exercise(g) => g.is_active,
            GoalRecord::Nutrition(_) | GoalRecord::Weight(_) => true,
        }
    }
}

impl<'de> Deserialize<'de> for GoalRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        GoalRecord::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Outcome of a zero-then-maybe-remove operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroOutcome {
    /// Both values reached zero; the record was pruned from the list.
    Removed,
    /// The value was zeroed but the record stays (the other value is nonzero).
    Zeroed,
    /// No record with that id at this date.
    NotFound,
}

/// Accumulated progress/goal totals for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTotals {
    pub total_progress: f64,
    pub total_goal: f64,
}

/// Fields that a client patch may never overwrite.
const IMMUTABLE_FIELDS: [&str; 3] = ["id", "userId", "kind"];

/// The per-user-per-date goal document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoalDoc {
    pub user_id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
}

impl DailyGoalDoc {
    pub fn new(user_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            date: date.into(),
            goals: Vec::new(),
        }
    }

    /// Document id in the `daily_goals` collection.
    pub fn doc_id(user_id: &str, date: &str) -> String {
        format!("{}_{}", user_id, date)
    }

    pub fn find(&self, goal_id: &str) -> Option<&GoalRecord> {
        self.goals.iter().find(|g| g.id() == goal_id)
    }

    pub fn find_by_name(&self, goal_name: &str) -> Option<&GoalRecord> {
        self.goals.iter().find(|g| g.goal_name() == Some(goal_name))
    }

    /// Apply a field-level patch to the record with the given id.
    ///
    /// The record is rendered to a map, the patch keys overwrite matching
    /// fields (immutable fields skipped), `updatedAt` is stamped, and the map
    /// is decoded back. A patch that breaks the record's shape is rejected
    /// without modifying the document.
    pub fn apply_patch(
        &mut self,
        goal_id: &str,
        patch: &Map<String, Value>,
    ) -> Result<Option<GoalRecord>, String> {
        let Some(idx) = self.goals.iter().position(|g| g.id() == goal_id) else {
            return Ok(None);
        };

        let mut rendered = match serde_json::to_value(&self.goals[idx]) {
            Ok(Value::Object(map)) => map,
            _ => return Err("goal record did not render as an object".to_string()),
        };

        for (key, value) in patch {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            rendered.insert(key.clone(), value.clone());
        }
        rendered.insert("updatedAt".to_string(), Value::String(now_rfc3339()));

        let updated = GoalRecord::from_value(&Value::Object(rendered))?;
        self.goals[idx] = updated.clone();
        Ok(Some(updated))
    }

    /// Set the record's goal value to zero, pruning it when progress is
    /// already zero. Weight goals have no value pair and are pruned outright.
    pub fn clear_goal_value(&mut self, goal_id: &str) -> ZeroOutcome {
        let Some(idx) = self.goals.iter().position(|g| g.id() == goal_id) else {
            return ZeroOutcome::NotFound;
        };

        let progress = match &mut self.goals[idx] {
            GoalRecord::Exercise(g) => {
                g.goal_value = 0.0;
                g.progress_value
            }
            GoalRecord::Nutrition(g) => {
                g.goal_value = 0.0;
                g.progress_value
            }
            GoalRecord::Weight(_) => 0.0,
        };

        if progress == 0.0 {
            self.goals.remove(idx);
            ZeroOutcome::Removed
        } else {
            ZeroOutcome::Zeroed
        }
    }

    /// Set the record's progress value to zero, pruning it when the goal
    /// value is already zero. Counterpart of [`Self::clear_goal_value`].
    pub fn clear_progress_value(&mut self, goal_id: &str) -> ZeroOutcome {
        let Some(idx) = self.goals.iter().position(|g| g.id() == goal_id) else {
            return ZeroOutcome::NotFound;
        };

        let goal_value = match &mut self.goals[idx] {
            GoalRecord::Exercise(g) => {
                g.progress_value = 0.0;
                g.goal_value
            }
            GoalRecord::Nutrition(g) => {
                g.progress_value = 0.0;
                g.goal_value
            }
            GoalRecord::Weight(_) => 0.0,
        };

        if goal_value == 0.0 {
            self.goals.remove(idx);
            ZeroOutcome::Removed
        } else {
            ZeroOutcome::Zeroed
        }
    }

    /// Set the progress value on the record with the given id.
    /// Returns false if no record matches.
    pub fn set_progress_value(&mut self, goal_id: &str, value: f64) -> bool {
        for goal in &mut self.goals {
            match goal {
                GoalRecord::Exercise(g) if g.id == goal_id => {
                    g.progress_value = value;
                    return true;
                }
                GoalRecord::Nutrition(g) if g.id == goal_id => {
                    g.progress_value = value;
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    /// Sum progress and goal values across the list, skipping records whose
    /// goal value is zero (parked goals awaiting prune) and records without a
    /// value pair.
    pub fn progress_totals(&self) -> ProgressTotals {
        let mut totals = ProgressTotals {
            total_progress: 0.0,
            total_goal: 0.0,
        };
        for goal in &self.goals {
            if let Some((goal_value, progress_value)) = goal.values() {
                if goal_value > 0.0 {
                    totals.total_goal += goal_value;
                    totals.total_progress += progress_value;
                }
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(id: &str, goal_value: f64, progress_value: f64) -> GoalRecord {
        GoalRecord::Exercise(ExerciseGoal {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            exercise_id: "ex-1".to_string(),
            goal_name: "pushups".to_string(),
            unit_type: "reps".to_string(),
            goal_value,
            progress_value,
            comments: String::new(),
            is_active: true,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        })
    }

    fn nutrition(id: &str, name: &str, goal_value: f64, progress_value: f64) -> GoalRecord {
        GoalRecord::Nutrition(NutritionGoal {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            goal_name: name.to_string(),
            unit_type: "ml".to_string(),
            goal_value,
            progress_value,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        })
    }

    fn doc_with(goals: Vec<GoalRecord>) -> DailyGoalDoc {
        let mut doc = DailyGoalDoc::new("user-1", "2024-01-01");
        doc.goals = goals;
        doc
    }

    #[test]
    fn test_tagged_round_trip_stays_exercise() {
        let original = exercise("g1", 50.0, 0.0);
        let value = serde_json::to_value(&original).unwrap();

        assert_eq!(value.get("kind").unwrap(), "exercise");
        let decoded = GoalRecord::from_value(&value).unwrap();
        assert!(matches!(decoded, GoalRecord::Exercise(_)));
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_untagged_exercise_probes_as_exercise_not_nutrition() {
        // Legacy record: no kind tag, but carries the exercise-only fields.
        // Nutrition would also structurally accept it, so order matters.
        let value = json!({
            "id": "g1",
            "userId": "user-1",
            "exerciseId": "ex-1",
            "goalName": "pushups",
            "unitType": "reps",
            "goalValue": 50.0,
            "progressValue": 10.0,
            "comments": "",
            "isActive": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        });

        let decoded = GoalRecord::from_value(&value).unwrap();
        assert!(matches!(decoded, GoalRecord::Exercise(_)));
    }

    #[test]
    fn test_untagged_nutrition_probes_as_nutrition() {
        // No exerciseId, so the exercise probe must fail first.
        let value = json!({
            "id": "g2",
            "userId": "user-1",
            "goalName": "water",
            "unitType": "ml",
            "goalValue": 2000.0,
            "progressValue": 500.0,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        });

        let decoded = GoalRecord::from_value(&value).unwrap();
        assert!(matches!(decoded, GoalRecord::Nutrition(_)));
    }

    #[test]
    fn test_untagged_weight_probes_as_weight() {
        let value = json!({
            "id": "g3",
            "userId": "user-1",
            "targetWeight": 70.0,
            "currentWeight": 75.0,
            "unit": "kg",
            "entries": [{"value": 75.0, "date": "2024-01-01"}],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        });

        let decoded = GoalRecord::from_value(&value).unwrap();
        assert!(matches!(decoded, GoalRecord::Weight(_)));
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let value = json!({"id": "g4", "something": "else"});
        assert!(GoalRecord::from_value(&value).is_err());

        let bad_kind = json!({"id": "g4", "kind": "sleep"});
        assert!(GoalRecord::from_value(&bad_kind).is_err());
    }

    #[test]
    fn test_clear_goal_value_prunes_when_progress_zero() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 0.0)]);

        assert_eq!(doc.clear_goal_value("g1"), ZeroOutcome::Removed);
        assert!(doc.goals.is_empty());
    }

    #[test]
    fn test_clear_goal_value_retains_when_progress_nonzero() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 30.0)]);

        assert_eq!(doc.clear_goal_value("g1"), ZeroOutcome::Zeroed);
        assert_eq!(doc.goals.len(), 1);
        assert_eq!(doc.goals[0].values(), Some((0.0, 30.0)));
    }

    #[test]
    fn test_clear_goal_value_missing_id() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 30.0)]);
        assert_eq!(doc.clear_goal_value("nope"), ZeroOutcome::NotFound);
    }

    #[test]
    fn test_clear_progress_then_goal_removes() {
        // The worked scenario: delete zeroes the goal value but progress keeps
        // the record alive; once progress is also cleared the record goes.
        let mut doc = doc_with(vec![exercise("g1", 50.0, 50.0)]);

        assert_eq!(doc.clear_goal_value("g1"), ZeroOutcome::Zeroed);
        assert_eq!(doc.clear_progress_value("g1"), ZeroOutcome::Removed);
        assert!(doc.goals.is_empty());
    }

    #[test]
    fn test_progress_totals_exclude_zero_goals() {
        let doc = doc_with(vec![
            exercise("g1", 50.0, 50.0),
            nutrition("g2", "water", 2000.0, 500.0),
            // Parked: zero goal value must not contribute either accumulator.
            nutrition("g3", "calorie", 0.0, 300.0),
        ]);

        let totals = doc.progress_totals();
        assert_eq!(totals.total_goal, 2050.0);
        assert_eq!(totals.total_progress, 550.0);
    }

    #[test]
    fn test_progress_totals_empty_doc() {
        let doc = doc_with(vec![]);
        let totals = doc.progress_totals();
        assert_eq!(totals.total_goal, 0.0);
        assert_eq!(totals.total_progress, 0.0);
    }

    #[test]
    fn test_apply_patch_overwrites_fields_and_stamps_updated_at() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 0.0)]);

        let mut patch = Map::new();
        patch.insert("progressValue".to_string(), json!(25.0));
        patch.insert("comments".to_string(), json!("halfway"));

        let updated = doc.apply_patch("g1", &patch).unwrap().unwrap();
        match updated {
            GoalRecord::Exercise(g) => {
                assert_eq!(g.progress_value, 25.0);
                assert_eq!(g.comments, "halfway");
                assert_ne!(g.updated_at, "2024-01-01T00:00:00Z");
            }
            other => panic!("expected exercise goal, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_patch_skips_immutable_fields() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 0.0)]);

        let mut patch = Map::new();
        patch.insert("id".to_string(), json!("hijacked"));
        patch.insert("userId".to_string(), json!("someone-else"));
        patch.insert("kind".to_string(), json!("weight"));

        let updated = doc.apply_patch("g1", &patch).unwrap().unwrap();
        assert_eq!(updated.id(), "g1");
        assert!(matches!(updated, GoalRecord::Exercise(_)));
    }

    #[test]
    fn test_apply_patch_rejects_shape_breaking_patch() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 0.0)]);

        let mut patch = Map::new();
        patch.insert("goalValue".to_string(), json!("not a number"));

        assert!(doc.apply_patch("g1", &patch).is_err());
        // Document untouched on rejection
        assert_eq!(doc.goals[0].values(), Some((50.0, 0.0)));
    }

    #[test]
    fn test_apply_patch_unknown_id() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 0.0)]);
        let patch = Map::new();
        assert!(doc.apply_patch("missing", &patch).unwrap().is_none());
    }

    #[test]
    fn test_set_progress_value() {
        let mut doc = doc_with(vec![exercise("g1", 50.0, 0.0)]);

        assert!(doc.set_progress_value("g1", 50.0));
        assert_eq!(doc.goals[0].values(), Some((50.0, 50.0)));
        assert!(!doc.set_progress_value("missing", 1.0));
    }

    #[test]
    fn test_find_by_name() {
        let doc = doc_with(vec![
            exercise("g1", 50.0, 0.0),
            nutrition("g2", "water", 2000.0, 0.0),
        ]);

        assert_eq!(doc.find_by_name("water").unwrap().id(), "g2");
        assert_eq!(doc.find_by_name("pushups").unwrap().id(), "g1");
        assert!(doc.find_by_name("missing").is_none());
    }
}
