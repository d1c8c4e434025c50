// SPDX-License-Identifier: MIT

//! Goal CRUD routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Goal, GoalType};
use crate::time_utils::now_utc_millis;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/goal", post(create_goal).get(list_goals))
        .route("/api/goal/current", get(current_goal))
        .route("/api/goal/{id}", put(update_goal).delete(delete_goal))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub goal_type: GoalType,
    pub target_weight: Option<f64>,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub fiber_goal: Option<f64>,
    pub start_date: chrono::NaiveDate,
    pub target_date: Option<chrono::NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Create a goal.
async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>)> {
    if let Some(target_date) = payload.target_date {
        if target_date < payload.start_date {
            return Err(AppError::BadRequest(
                "targetDate must not precede startDate".to_string(),
            ));
        }
    }

    let now = now_utc_millis();
    let goal = Goal {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        goal_type: payload.goal_type,
        target_weight: payload.target_weight,
        calorie_goal: payload.calorie_goal,
        protein_goal: payload.protein_goal,
        carb_goal: payload.carb_goal,
        fat_goal: payload.fat_goal,
        fiber_goal: payload.fiber_goal,
        start_date: payload.start_date,
        target_date: payload.target_date,
        is_active: payload.is_active,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_goal(&goal).await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// The goal currently effective for the user (404 when none).
async fn current_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Goal>> {
    let today = chrono::Utc::now().date_naive();
    state
        .aggregator
        .goal_resolver()
        .current_goal(&user.user_id, today)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No active goal".to_string()))
}

/// All goals, newest first.
async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Goal>>> {
    Ok(Json(state.db.goals_for_user(&user.user_id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub goal_type: Option<GoalType>,
    pub target_weight: Option<f64>,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carb_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub fiber_goal: Option<f64>,
    pub start_date: Option<chrono::NaiveDate>,
    pub target_date: Option<chrono::NaiveDate>,
    pub is_active: Option<bool>,
}

/// Load a goal and verify ownership.
async fn owned_goal(state: &AppState, user_id: &str, goal_id: &str) -> Result<Goal> {
    state
        .db
        .get_goal(goal_id)
        .await?
        .filter(|g| g.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))
}

/// Partial update of an owned goal.
async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<String>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>> {
    let mut goal = owned_goal(&state, &user.user_id, &goal_id).await?;

    if let Some(goal_type) = payload.goal_type {
        goal.goal_type = goal_type;
    }
    if payload.target_weight.is_some() {
        goal.target_weight = payload.target_weight;
    }
    if payload.calorie_goal.is_some() {
        goal.calorie_goal = payload.calorie_goal;
    }
    if payload.protein_goal.is_some() {
        goal.protein_goal = payload.protein_goal;
    }
    if payload.carb_goal.is_some() {
        goal.carb_goal = payload.carb_goal;
    }
    if payload.fat_goal.is_some() {
        goal.fat_goal = payload.fat_goal;
    }
    if payload.fiber_goal.is_some() {
        goal.fiber_goal = payload.fiber_goal;
    }
    if let Some(start_date) = payload.start_date {
        goal.start_date = start_date;
    }
    if payload.target_date.is_some() {
        goal.target_date = payload.target_date;
    }
    if let Some(is_active) = payload.is_active {
        goal.is_active = is_active;
    }
    goal.updated_at = now_utc_millis();

    state.db.upsert_goal(&goal).await?;
    Ok(Json(goal))
}

#[derive(Serialize)]
pub struct DeleteGoalResponse {
    pub message: String,
}

/// Delete an owned goal.
async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<String>,
) -> Result<Json<DeleteGoalResponse>> {
    owned_goal(&state, &user.user_id, &goal_id).await?;
    state.db.delete_goal(&goal_id).await?;

    Ok(Json(DeleteGoalResponse {
        message: "Goal deleted".to_string(),
    }))
}
