// SPDX-License-Identifier: MIT

//! Daily nutrition aggregation.
//!
//! Turns the day's meal logs into the canonical `NutritionRecord`:
//! 1. Fetch all meals with `consumedAt` inside the day window
//! 2. Sum nutrient totals and per-meal-type breakdowns
//! 3. Resolve the effective goals for the date
//! 4. Evaluate achievement flags
//! 5. Upsert the record keyed by (user, date)
//!
//! Idempotent: re-running with unchanged meals produces the identical record
//! (apart from updatedAt), so the write path calls it after every meal
//! mutation. Concurrent calls for the same day race last-upsert-wins; the
//! losing write is recomputed from the same meal set, so the accepted
//! limitation costs nothing but a redundant write.

use chrono::NaiveDate;

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{
    Achievements, FoodLog, GoalTargets, MealBreakdown, MealLog, NutritionRecord, NutritionTotals,
};
use crate::services::goals::GoalResolver;
use crate::time_utils::{day_bounds, now_utc_millis};

/// Lower bound of the calorie achievement band, as a fraction of the goal.
const CALORIE_BAND_LOW: f64 = 0.9;
/// Upper bound of the calorie achievement band, as a fraction of the goal.
const CALORIE_BAND_HIGH: f64 = 1.1;
/// Fraction of the protein goal that counts as met.
const PROTEIN_MET_FRACTION: f64 = 0.8;

/// Sum a day's meals into daily totals and a per-meal-type breakdown.
pub fn aggregate_meals(meals: &[MealLog]) -> (NutritionTotals, MealBreakdown) {
    let mut totals = NutritionTotals::default();
    let mut breakdown = MealBreakdown::default();

    for meal in meals {
        totals.add(&meal.total_nutrition);

        let slot = breakdown.slot_mut(meal.meal_type);
        slot.calories += meal.total_nutrition.calories;
        slot.protein += meal.total_nutrition.protein;
        slot.carbs += meal.total_nutrition.carbs;
        slot.fat += meal.total_nutrition.fat;
    }

    (totals, breakdown)
}

/// Evaluate achievement flags against resolved goals.
///
/// An unset goal field means the corresponding flag is false. Water tracking
/// is not implemented, so that flag is hardwired false.
pub fn evaluate_achievements(totals: &NutritionTotals, goals: &GoalTargets) -> Achievements {
    let calorie_goal_met = goals.calories.is_some_and(|goal| {
        totals.calories >= goal * CALORIE_BAND_LOW && totals.calories <= goal * CALORIE_BAND_HIGH
    });
    let protein_goal_met = goals
        .protein
        .is_some_and(|goal| totals.protein >= goal * PROTEIN_MET_FRACTION);

    Achievements {
        calorie_goal_met,
        protein_goal_met,
        water_goal_met: false,
    }
}

/// Computes and persists per-day nutrition documents.
#[derive(Clone)]
pub struct NutritionAggregator {
    db: FirestoreDb,
    goals: GoalResolver,
}

impl NutritionAggregator {
    pub fn new(db: FirestoreDb) -> Self {
        let goals = GoalResolver::new(db.clone());
        Self { db, goals }
    }

    pub fn goal_resolver(&self) -> &GoalResolver {
        &self.goals
    }

    /// Fetch a user's meals for one calendar day, oldest first.
    pub async fn meals_for_day(&self, user_id: &str, date: NaiveDate) -> Result<Vec<MealLog>> {
        let (start, end) = day_bounds(date);
        self.db.meals_for_user_between(user_id, &start, &end).await
    }

    /// Recompute and upsert the canonical `NutritionRecord` for (user, date).
    ///
    /// Writes exactly one document; createdAt is preserved across upserts.
    pub async fn update_daily_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<NutritionRecord> {
        let meals = self.meals_for_day(user_id, date).await?;
        let (daily_totals, meal_breakdown) = aggregate_meals(&meals);
        let goals = self.goals.resolve(user_id, date).await?;
        let achievements = evaluate_achievements(&daily_totals, &goals);

        let existing = self.db.get_nutrition_record(user_id, date).await?;
        let now = now_utc_millis();
        let created_at = existing.map_or_else(|| now.clone(), |r| r.created_at);

        let record = NutritionRecord {
            user_id: user_id.to_string(),
            date,
            daily_totals,
            meal_breakdown,
            goals,
            achievements,
            created_at,
            updated_at: now,
        };

        self.db.upsert_nutrition_record(&record).await?;

        tracing::debug!(
            user_id,
            date = %date,
            meals = meals.len(),
            calories = record.daily_totals.calories,
            "Daily nutrition record updated"
        );

        Ok(record)
    }

    /// Rebuild the per-day `FoodLog` pointer document from the day's meals.
    ///
    /// Returns the rebuilt log together with the meals it points at.
    pub async fn rebuild_food_log(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<(FoodLog, Vec<MealLog>)> {
        let meals = self.meals_for_day(user_id, date).await?;

        let mut totals_snapshot = NutritionTotals::default();
        for meal in &meals {
            totals_snapshot.add(&meal.total_nutrition);
        }
        let meal_ids: Vec<String> = meals.iter().map(|m| m.id.clone()).collect();

        let existing = self.db.get_food_log(user_id, date).await?;
        let now = now_utc_millis();
        let created_at = existing.map_or_else(|| now.clone(), |l| l.created_at);

        let log = FoodLog {
            user_id: user_id.to_string(),
            date,
            meals: meal_ids,
            totals_snapshot,
            created_at,
            updated_at: now,
        };

        self.db.upsert_food_log(&log).await?;

        Ok((log, meals))
    }
}
