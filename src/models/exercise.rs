// SPDX-License-Identifier: MIT

//! Exercise reference catalog entry.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Static catalog entry describing one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: String,
    pub main_muscles: Vec<String>,
    pub difficulty: String,
    pub benefits: Vec<String>,
    pub steps: Vec<String>,
    pub tips: Vec<String>,
    pub estimated_time: String,
    pub video_url: String,
}

/// Payload for creating a catalog entry. Every field is required.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "mainMuscles is required"))]
    pub main_muscles: Vec<String>,
    #[validate(length(min = 1, message = "difficulty is required"))]
    pub difficulty: String,
    #[validate(length(min = 1, message = "benefits is required"))]
    pub benefits: Vec<String>,
    #[validate(length(min = 1, message = "steps is required"))]
    pub steps: Vec<String>,
    #[validate(length(min = 1, message = "tips is required"))]
    pub tips: Vec<String>,
    #[validate(length(min = 1, message = "estimatedTime is required"))]
    pub estimated_time: String,
    #[validate(url(message = "videoUrl must be a valid URL"))]
    pub video_url: String,
}

impl NewExercise {
    /// Materialize a catalog entry with a freshly generated id.
    pub fn into_exercise(self, id: String) -> Exercise {
        Exercise {
            id,
            name: self.name,
            category: self.category,
            main_muscles: self.main_muscles,
            difficulty: self.difficulty,
            benefits: self.benefits,
            steps: self.steps,
            tips: self.tips,
            estimated_time: self.estimated_time,
            video_url: self.video_url,
        }
    }
}
