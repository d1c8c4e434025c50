// SPDX-License-Identifier: MIT

//! Food-to-nutrition scaling: derives a meal's total nutrition from its food
//! list and per-100g reference data.
//!
//! This is an explicit compute-then-persist step called by the meal write
//! path, so the derivation is testable without the storage layer.

use std::collections::HashMap;

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{FoodItem, MealFood, NutritionTotals};

/// Sum the nutrition of a food list against resolved reference items.
///
/// Quantities are treated as grams-equivalent for every declared unit: the
/// scaling factor is always quantity/100 against per-100g reference data.
/// Entries whose food item is absent from `items` contribute zero.
pub fn meal_totals(foods: &[MealFood], items: &HashMap<String, FoodItem>) -> NutritionTotals {
    let mut totals = NutritionTotals::default();

    for food in foods {
        let Some(item) = items.get(&food.food_item_id) else {
            tracing::warn!(
                food_item_id = %food.food_item_id,
                "Unresolvable food reference; contributes zero to meal totals"
            );
            continue;
        };

        let factor = food.quantity / 100.0;
        let n = &item.nutrition_per_100g;
        totals.add(&NutritionTotals {
            calories: n.calories * factor,
            protein: n.protein * factor,
            carbs: n.carbs * factor,
            fat: n.fat * factor,
            fiber: n.fiber * factor,
            sugar: n.sugar * factor,
            sodium: n.sodium * factor,
        });
    }

    totals
}

/// Resolve the referenced food items and compute the meal's totals.
pub async fn compute_meal_totals(
    db: &FirestoreDb,
    foods: &[MealFood],
) -> Result<NutritionTotals> {
    let ids: Vec<String> = foods.iter().map(|f| f.food_item_id.clone()).collect();
    let items = db.get_food_items(&ids).await?;
    Ok(meal_totals(foods, &items))
}
