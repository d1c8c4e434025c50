// SPDX-License-Identifier: MIT

//! Food-log routes.
//!
//! A food log is the per-day index of meal ids with a totals snapshot. It is
//! always rebuilt from the day's meal logs, never edited directly.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::FoodLog;
use crate::routes::meal::{group_by_meal_type, GroupedMeals};
use crate::time_utils::parse_date_param;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/food-log/daily/{date}", get(daily_food_log))
        .route("/api/food-log/daily/{date}/sync", post(sync_food_log))
}

#[derive(Serialize)]
pub struct DailyFoodLogResponse {
    pub date: chrono::NaiveDate,
    pub log: FoodLog,
    pub meals: GroupedMeals,
}

/// Rebuild and return the day's food log together with its meals grouped by
/// meal type.
async fn daily_food_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<DailyFoodLogResponse>> {
    let date = parse_date_param(&date)?;
    let (log, meals) = state
        .aggregator
        .rebuild_food_log(&user.user_id, date)
        .await?;

    Ok(Json(DailyFoodLogResponse {
        date,
        log,
        meals: group_by_meal_type(meals),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFoodLogResponse {
    pub message: String,
    pub date: chrono::NaiveDate,
    pub meal_count: usize,
}

/// Force a rebuild of the day's food log and nutrition record. Used by
/// clients after offline edits land.
async fn sync_food_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<SyncFoodLogResponse>> {
    let date = parse_date_param(&date)?;
    let (log, _) = state
        .aggregator
        .rebuild_food_log(&user.user_id, date)
        .await?;
    state
        .aggregator
        .update_daily_record(&user.user_id, date)
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        %date,
        meal_count = log.meals.len(),
        "Food log synced"
    );

    Ok(Json(SyncFoodLogResponse {
        message: "Food log synced".to_string(),
        date,
        meal_count: log.meals.len(),
    }))
}
