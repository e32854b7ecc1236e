// SPDX-License-Identifier: MIT

//! Food log model: one document per user with an append-only item list.

use serde::{Deserialize, Serialize};

/// A logged food item with its nutrition breakdown.
///
/// Field names follow the nutrition-API convention the mobile clients use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "consumedAt")]
    pub consumed_at: String,
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

/// The per-user food log document (document id = `user_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogDoc {
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<FoodItem>,
    pub created_at: String,
    pub updated_at: String,
}

impl FoodLogDoc {
    /// Fresh empty log; `created_at` is stamped once here, on first insert.
    pub fn new(user_id: impl Into<String>, now: &str) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Remove the item with the given id. Returns false when nothing matched.
    pub fn remove_item(&mut self, item_id: &str, now: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        if self.items.len() == before {
            return false;
        }
        self.updated_at = now.to_string();
        true
    }
}
