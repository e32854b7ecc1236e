// SPDX-License-Identifier: MIT

//! Food intake logging.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{FoodItem, FoodLogDoc};
use crate::time_utils::now_rfc3339;

/// Inbound payload for logging a food item. Nutrition fields default to zero
/// so clients can log a bare name.
#[derive(Debug, Deserialize, Validate)]
pub struct NewFoodItem {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub serving_size_g: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub fat_total_g: f64,
    #[serde(default)]
    pub fat_saturated_g: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub potassium_mg: f64,
    #[serde(default)]
    pub cholesterol_mg: f64,
    #[serde(default)]
    pub carbohydrates_total_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sugar_g: f64,
}

/// Append-only food log, one document per user.
#[derive(Clone)]
pub struct FoodLog {
    db: FirestoreDb,
}

impl FoodLog {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Log a food item: assign an id and consumption time, upserting the
    /// parent document. `created_at` is stamped only on first insert.
    pub async fn append(&self, user_id: &str, input: NewFoodItem) -> Result<FoodItem, AppError> {
        input
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let now = now_rfc3339();
        let item = FoodItem {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            consumed_at: now.clone(),
            serving_size_g: input.serving_size_g,
            calories: input.calories,
            fat_total_g: input.fat_total_g,
            fat_saturated_g: input.fat_saturated_g,
            protein_g: input.protein_g,
            sodium_mg: input.sodium_mg,
            potassium_mg: input.potassium_mg,
            cholesterol_mg: input.cholesterol_mg,
            carbohydrates_total_g: input.carbohydrates_total_g,
            fiber_g: input.fiber_g,
            sugar_g: input.sugar_g,
        };

        let mut doc = self
            .db
            .get_food_log(user_id)
            .await?
            .unwrap_or_else(|| FoodLogDoc::new(user_id, &now));
        doc.items.push(item.clone());
        doc.updated_at = now;
        self.db.set_food_log(&doc).await?;

        tracing::debug!(user_id, item_id = %item.id, "Food item logged");
        Ok(item)
    }

    /// The user's food log; an empty document when nothing was logged yet,
    /// never a not-found error.
    pub async fn list(&self, user_id: &str) -> Result<FoodLogDoc, AppError> {
        match self.db.get_food_log(user_id).await? {
            Some(doc) => Ok(doc),
            None => Ok(FoodLogDoc::new(user_id, &now_rfc3339())),
        }
    }

    /// Remove one logged item by id.
    pub async fn remove(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        let mut doc = self
            .db
            .get_food_log(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Food item not found".to_string()))?;

        if !doc.remove_item(item_id, &now_rfc3339()) {
            return Err(AppError::NotFound("Food item not found".to_string()));
        }

        self.db.set_food_log(&doc).await?;
        tracing::debug!(user_id, item_id, "Food item removed");
        Ok(())
    }
}
