// SPDX-License-Identifier: MIT

//! Questionnaire routes: immutable onboarding snapshots plus profile sync.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::questionnaire::DerivedMetrics;
use crate::models::{ActivityLevel, Gender, MainGoal, Measurement, Profile, Questionnaire};
use crate::services::estimator::{body_mass_index, estimate_daily_calories, BodyMetrics};
use crate::time_utils::now_utc_millis;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_HISTORY_LIMIT: u32 = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/questionnaire", post(submit_questionnaire))
        .route("/api/questionnaire/latest", get(latest_questionnaire))
        .route("/api/questionnaire/history", get(questionnaire_history))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireRequest {
    pub main_goal: MainGoal,
    pub gender: Gender,
    pub birth_date: chrono::NaiveDate,
    /// cm
    pub height: f64,
    /// kg
    pub current_weight: f64,
    /// kg
    pub goal_weight: Option<f64>,
    pub activity_level: ActivityLevel,
}

/// Store a questionnaire snapshot with derived BMI and calorie estimate,
/// and sync the profile to the latest answers.
async fn submit_questionnaire(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<QuestionnaireRequest>,
) -> Result<(StatusCode, Json<Questionnaire>)> {
    let bmi = body_mass_index(payload.height, payload.current_weight)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let metrics = BodyMetrics {
        gender: payload.gender,
        date_of_birth: payload.birth_date,
        height_cm: payload.height,
        weight_kg: payload.current_weight,
        activity_level: payload.activity_level,
    };
    let estimated_calorie_needs =
        estimate_daily_calories(&metrics, chrono::Utc::now().date_naive())
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = now_utc_millis();
    let questionnaire = Questionnaire {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        main_goal: payload.main_goal,
        gender: payload.gender,
        birth_date: payload.birth_date,
        height: payload.height,
        current_weight: payload.current_weight,
        goal_weight: payload.goal_weight,
        activity_level: payload.activity_level,
        derived: DerivedMetrics {
            bmi,
            estimated_calorie_needs,
        },
        created_at: now.clone(),
    };
    state.db.add_questionnaire(&questionnaire).await?;

    // Sync the profile snapshot to the latest answers
    let existing = state.db.get_profile(&user.user_id).await?;
    let created_at = existing.map_or_else(|| now.clone(), |p| p.created_at);
    let profile = Profile {
        user_id: user.user_id.clone(),
        main_goal: payload.main_goal,
        gender: payload.gender,
        date_of_birth: payload.birth_date,
        height: Measurement::cm(payload.height),
        weight: Measurement::kg(payload.current_weight),
        activity_level: payload.activity_level,
        daily_calorie_goal: estimated_calorie_needs,
        created_at,
        updated_at: now,
    };
    state.db.upsert_profile(&profile).await?;

    tracing::info!(
        user_id = %user.user_id,
        bmi,
        estimated_calorie_needs,
        "Questionnaire stored and profile synced"
    );

    Ok((StatusCode::CREATED, Json(questionnaire)))
}

/// Latest questionnaire snapshot.
async fn latest_questionnaire(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Questionnaire>> {
    let mut list = state.db.questionnaires_for_user(&user.user_id, 1).await?;
    list.pop()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No questionnaire found".to_string()))
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<u32>,
}

/// Questionnaire history, newest first.
async fn questionnaire_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<Questionnaire>>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let list = state.db.questionnaires_for_user(&user.user_id, limit).await?;
    Ok(Json(list))
}
