// SPDX-License-Identifier: MIT

//! Food reference routes: creation, search and lookup.

use crate::error::{AppError, Result};
use crate::models::food::ServingSize;
use crate::models::{FoodCategory, FoodItem, FoodSource, NutritionPer100g};
use crate::time_utils::now_utc_millis;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

const SEARCH_RESULT_LIMIT: u32 = 25;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/food", post(create_food))
        .route("/api/food/search", get(search_food))
        .route("/api/food/by-name/{name}", get(food_by_name))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    #[serde(default)]
    pub category: FoodCategory,
    #[serde(default)]
    pub serving_size: ServingSize,
    pub nutrition_per_100g: NutritionPer100g,
    #[serde(default)]
    pub source: FoodSource,
}

/// Create a food reference record.
async fn create_food(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<FoodItem>)> {
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let now = now_utc_millis();
    let item = FoodItem {
        id: uuid::Uuid::new_v4().to_string(),
        name_lower: name.to_lowercase(),
        name,
        brand: payload.brand,
        barcode: payload.barcode,
        category: payload.category,
        serving_size: payload.serving_size,
        nutrition_per_100g: payload.nutrition_per_100g,
        is_verified: false,
        source: payload.source,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_food_item(&item).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

/// Search food items by name prefix (case-insensitive, up to 25 results).
async fn search_food(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<FoodItem>>> {
    let Some(query) = params.query.filter(|q| !q.trim().is_empty()) else {
        return Ok(Json(vec![]));
    };

    let items = state
        .db
        .search_food(query.trim(), SEARCH_RESULT_LIMIT)
        .await?;
    Ok(Json(items))
}

/// Case-insensitive exact lookup by name.
async fn food_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<FoodItem>> {
    state
        .db
        .find_food_by_name(name.trim())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Food item '{}' not found", name)))
}
