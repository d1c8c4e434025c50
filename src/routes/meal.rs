// SPDX-License-Identifier: MIT

//! Meal logging routes.
//!
//! Every write recomputes the meal's totals from its food list (scaler) and
//! then re-runs the daily aggregator for the affected date(s), keeping the
//! canonical `NutritionRecord` in step with the meal logs.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{MealFood, MealLog, MealType};
use crate::services::scaler::compute_meal_totals;
use crate::time_utils::{day_bounds, format_utc_millis, now_utc_millis, parse_date_param, parse_utc};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_NOTES_LEN: usize = 500;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/meal", post(create_meal).get(list_meals))
        .route("/api/meal/daily/{date}", get(daily_meals))
        .route("/api/meal/{id}", put(update_meal).delete(delete_meal))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub meal_type: MealType,
    pub foods: Vec<MealFood>,
    /// RFC3339; defaults to now
    pub consumed_at: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

fn validate_foods(foods: &[MealFood]) -> Result<()> {
    if foods.iter().any(|f| f.quantity < 0.0) {
        return Err(AppError::BadRequest(
            "Food quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_notes(notes: &Option<String>) -> Result<()> {
    if notes.as_ref().is_some_and(|n| n.len() > MAX_NOTES_LEN) {
        return Err(AppError::BadRequest(format!(
            "Notes must be at most {} characters",
            MAX_NOTES_LEN
        )));
    }
    Ok(())
}

/// Log a meal: derive its totals, persist it, then recompute the day's
/// nutrition record.
async fn create_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealLog>)> {
    validate_foods(&payload.foods)?;
    validate_notes(&payload.notes)?;

    let consumed_at = match payload.consumed_at.as_deref() {
        Some(raw) => format_utc_millis(parse_utc(raw)?),
        None => now_utc_millis(),
    };

    let total_nutrition = compute_meal_totals(&state.db, &payload.foods).await?;

    let now = now_utc_millis();
    let meal = MealLog {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        meal_type: payload.meal_type,
        foods: payload.foods,
        total_nutrition,
        consumed_at: consumed_at.clone(),
        notes: payload.notes,
        image_url: payload.image_url,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_meal_log(&meal).await?;

    let date = parse_utc(&consumed_at)?.date_naive();
    state
        .aggregator
        .update_daily_record(&user.user_id, date)
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        meal_id = %meal.id,
        calories = meal.total_nutrition.calories,
        "Meal logged"
    );

    Ok((StatusCode::CREATED, Json(meal)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MealListQuery {
    /// YYYY-MM-DD
    start_date: Option<String>,
    /// YYYY-MM-DD
    end_date: Option<String>,
}

/// List meals, newest first, optionally restricted to a date range.
async fn list_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<MealListQuery>,
) -> Result<Json<Vec<MealLog>>> {
    let meals = match (params.start_date.as_deref(), params.end_date.as_deref()) {
        (Some(start), Some(end)) => {
            let (start, _) = day_bounds(parse_date_param(start)?);
            let (_, end) = day_bounds(parse_date_param(end)?);
            let mut meals = state
                .db
                .meals_for_user_between(&user.user_id, &start, &end)
                .await?;
            meals.reverse(); // newest first, matching the unfiltered listing
            meals
        }
        _ => state.db.meals_for_user(&user.user_id).await?,
    };
    Ok(Json(meals))
}

/// A day's meals grouped by meal type.
#[derive(Serialize, Default)]
pub struct GroupedMeals {
    pub breakfast: Vec<MealLog>,
    pub lunch: Vec<MealLog>,
    pub dinner: Vec<MealLog>,
    pub snack: Vec<MealLog>,
}

#[derive(Serialize)]
pub struct DailyMealsResponse {
    pub date: chrono::NaiveDate,
    pub meals: GroupedMeals,
}

pub(crate) fn group_by_meal_type(meals: Vec<MealLog>) -> GroupedMeals {
    let mut grouped = GroupedMeals::default();
    for meal in meals {
        match meal.meal_type {
            MealType::Breakfast => grouped.breakfast.push(meal),
            MealType::Lunch => grouped.lunch.push(meal),
            MealType::Dinner => grouped.dinner.push(meal),
            MealType::Snack => grouped.snack.push(meal),
        }
    }
    grouped
}

/// Meals for a date, grouped by meal type.
async fn daily_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<DailyMealsResponse>> {
    let date = parse_date_param(&date)?;
    let meals = state.aggregator.meals_for_day(&user.user_id, date).await?;

    Ok(Json(DailyMealsResponse {
        date,
        meals: group_by_meal_type(meals),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub meal_type: Option<MealType>,
    pub foods: Option<Vec<MealFood>>,
    pub consumed_at: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// Load a meal and verify ownership.
async fn owned_meal(state: &AppState, user_id: &str, meal_id: &str) -> Result<MealLog> {
    state
        .db
        .get_meal_log(meal_id)
        .await?
        .filter(|m| m.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))
}

/// Update a meal; totals are re-derived when the food list changes, and the
/// daily record is recomputed for every affected date.
async fn update_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(meal_id): Path<String>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<Json<MealLog>> {
    let mut meal = owned_meal(&state, &user.user_id, &meal_id).await?;
    let old_date = parse_utc(&meal.consumed_at)?.date_naive();

    if let Some(meal_type) = payload.meal_type {
        meal.meal_type = meal_type;
    }
    if let Some(foods) = payload.foods {
        validate_foods(&foods)?;
        meal.total_nutrition = compute_meal_totals(&state.db, &foods).await?;
        meal.foods = foods;
    }
    if let Some(raw) = payload.consumed_at.as_deref() {
        meal.consumed_at = format_utc_millis(parse_utc(raw)?);
    }
    if payload.notes.is_some() {
        validate_notes(&payload.notes)?;
        meal.notes = payload.notes;
    }
    if payload.image_url.is_some() {
        meal.image_url = payload.image_url;
    }
    meal.updated_at = now_utc_millis();

    state.db.upsert_meal_log(&meal).await?;

    let new_date = parse_utc(&meal.consumed_at)?.date_naive();
    state
        .aggregator
        .update_daily_record(&user.user_id, new_date)
        .await?;
    if old_date != new_date {
        state
            .aggregator
            .update_daily_record(&user.user_id, old_date)
            .await?;
    }

    Ok(Json(meal))
}

#[derive(Serialize)]
pub struct DeleteMealResponse {
    pub message: String,
}

/// Delete a meal and recompute its day's record.
async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(meal_id): Path<String>,
) -> Result<Json<DeleteMealResponse>> {
    let meal = owned_meal(&state, &user.user_id, &meal_id).await?;
    let date = parse_utc(&meal.consumed_at)?.date_naive();

    state.db.delete_meal_log(&meal.id).await?;
    state
        .aggregator
        .update_daily_record(&user.user_id, date)
        .await?;

    Ok(Json(DeleteMealResponse {
        message: "Meal deleted".to_string(),
    }))
}
