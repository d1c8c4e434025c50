// SPDX-License-Identifier: MIT

//! Derived per-day nutrition documents.
//!
//! `NutritionRecord` is the canonical computed summary for one (user, date);
//! `FoodLog` is a per-day pointer document holding the meal id list and a
//! cached totals snapshot. Both are rebuilt on demand from `MealLog`, never
//! edited directly.

use serde::{Deserialize, Serialize};

use crate::models::meal::{MealType, NutritionTotals};

/// The four primary macro fields tracked per meal type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSummary {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// Per-meal-type macro breakdown; unlogged meal types stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealBreakdown {
    #[serde(default)]
    pub breakfast: MacroSummary,
    #[serde(default)]
    pub lunch: MacroSummary,
    #[serde(default)]
    pub dinner: MacroSummary,
    #[serde(default)]
    pub snack: MacroSummary,
}

impl MealBreakdown {
    pub fn slot_mut(&mut self, meal_type: MealType) -> &mut MacroSummary {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
            MealType::Snack => &mut self.snack,
        }
    }
}

/// Calorie/macro targets resolved for a specific day.
///
/// Fields from an explicit goal may be individually absent; the
/// profile-derived fallback always fills all four.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}

/// Daily goal attainment flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
    /// Calories within ±10% of the target
    #[serde(default)]
    pub calorie_goal_met: bool,
    /// Protein at 80% of the target or above
    #[serde(default)]
    pub protein_goal_met: bool,
    /// Water tracking is not implemented; always false
    #[serde(default)]
    pub water_goal_met: bool,
}

/// Canonical per-day summary stored in Firestore
/// (`nutrition_records/{user_id}_{date}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub user_id: String,
    /// Calendar date (YYYY-MM-DD); the (userId, date) pair is unique by
    /// construction of the document id.
    pub date: chrono::NaiveDate,
    pub daily_totals: NutritionTotals,
    pub meal_breakdown: MealBreakdown,
    pub goals: GoalTargets,
    pub achievements: Achievements,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-day aggregation pointer stored in Firestore
/// (`food_logs/{user_id}_{date}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub user_id: String,
    pub date: chrono::NaiveDate,
    /// Meal log document ids for the day, in consumption order
    pub meals: Vec<String>,
    pub totals_snapshot: NutritionTotals,
    pub created_at: String,
    pub updated_at: String,
}
