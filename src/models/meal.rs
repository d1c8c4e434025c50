// SPDX-License-Identifier: MIT

//! Logged meal model.

use serde::{Deserialize, Serialize};

use crate::models::food::FoodUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];
}

/// One food entry within a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFood {
    pub food_item_id: String,
    pub quantity: f64,
    pub unit: FoodUnit,
}

/// Summed nutrient amounts across foods or meals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub sodium: f64,
}

impl NutritionTotals {
    /// Accumulate another total into this one, field by field.
    pub fn add(&mut self, other: &NutritionTotals) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
        self.fiber += other.fiber;
        self.sugar += other.sugar;
        self.sodium += other.sodium;
    }
}

/// Logged meal stored in Firestore (`meal_logs/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    /// Document id (uuid)
    pub id: String,
    /// Owning user id
    pub user_id: String,
    pub meal_type: MealType,
    pub foods: Vec<MealFood>,
    /// Derived from `foods` by the scaler before every persist;
    /// never accepted from the client.
    pub total_nutrition: NutritionTotals,
    /// RFC3339 UTC timestamp with millisecond precision
    pub consumed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
