// SPDX-License-Identifier: MIT

//! Dashboard routes: per-day and trailing-week nutrition summaries.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::NutritionRecord;
use crate::time_utils::parse_date_param;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{Days, Utc};
use std::sync::Arc;

const WEEKLY_WINDOW_DAYS: u64 = 7;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard/daily/{date}", get(daily_dashboard))
        .route("/api/dashboard/weekly", get(weekly_dashboard))
}

/// Nutrition record for a single day, recomputed from the day's meals on
/// every read so the dashboard never shows a stale record.
async fn daily_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<NutritionRecord>> {
    let date = parse_date_param(&date)?;
    let record = state
        .aggregator
        .update_daily_record(&user.user_id, date)
        .await?;
    Ok(Json(record))
}

/// Stored records for the last seven days (today inclusive), oldest first,
/// as a bare array matching the existing mobile clients. Days with no record
/// are simply absent; clients treat gaps as zero days.
async fn weekly_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<NutritionRecord>>> {
    let end_date = Utc::now().date_naive();
    let start_date = end_date
        .checked_sub_days(Days::new(WEEKLY_WINDOW_DAYS - 1))
        .unwrap_or(end_date);

    let records = state
        .db
        .nutrition_records_between(&user.user_id, start_date, end_date)
        .await?;

    Ok(Json(records))
}
