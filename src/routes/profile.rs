// SPDX-License-Identifier: MIT

//! Health profile routes: survey submission and profile updates.
//!
//! The mobile client sends height/weight either as a bare number or as a
//! `{value, unit}` object. Both shapes are normalized to cm/kg here, at the
//! API boundary, before any value reaches the estimator.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityLevel, Gender, MainGoal, Measurement, Profile};
use crate::services::estimator::{estimate_daily_calories, BodyMetrics};
use crate::time_utils::now_utc_millis;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const CM_PER_INCH: f64 = 2.54;
const KG_PER_LB: f64 = 0.453_592_37;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile/survey", post(submit_survey))
        .route("/api/profile", get(get_profile).put(update_profile))
}

/// Height or weight as the client sends it: a bare number (already metric)
/// or a value with an explicit unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MeasurementInput {
    Value(f64),
    WithUnit { value: f64, unit: String },
}

impl MeasurementInput {
    /// Normalize a height input to centimeters.
    pub fn to_cm(&self) -> Result<f64> {
        match self {
            MeasurementInput::Value(v) => Ok(*v),
            MeasurementInput::WithUnit { value, unit } => match unit.as_str() {
                "cm" => Ok(*value),
                "inches" => Ok(*value * CM_PER_INCH),
                other => Err(AppError::BadRequest(format!(
                    "Unsupported height unit: {}",
                    other
                ))),
            },
        }
    }

    /// Normalize a weight input to kilograms.
    pub fn to_kg(&self) -> Result<f64> {
        match self {
            MeasurementInput::Value(v) => Ok(*v),
            MeasurementInput::WithUnit { value, unit } => match unit.as_str() {
                "kg" => Ok(*value),
                "lbs" => Ok(*value * KG_PER_LB),
                other => Err(AppError::BadRequest(format!(
                    "Unsupported weight unit: {}",
                    other
                ))),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRequest {
    pub main_goal: MainGoal,
    pub gender: Gender,
    pub date_of_birth: chrono::NaiveDate,
    pub height: MeasurementInput,
    pub weight: MeasurementInput,
    pub activity_level: ActivityLevel,
}

/// Submit the onboarding survey: computes the daily calorie goal and upserts
/// the (single) profile document.
async fn submit_survey(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SurveyRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    let height_cm = payload.height.to_cm()?;
    let weight_kg = payload.weight.to_kg()?;

    let metrics = BodyMetrics {
        gender: payload.gender,
        date_of_birth: payload.date_of_birth,
        height_cm,
        weight_kg,
        activity_level: payload.activity_level,
    };
    let daily_calorie_goal = estimate_daily_calories(&metrics, chrono::Utc::now().date_naive())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = state.db.get_profile(&user.user_id).await?;
    let now = now_utc_millis();
    let created_at = existing.map_or_else(|| now.clone(), |p| p.created_at);

    let profile = Profile {
        user_id: user.user_id.clone(),
        main_goal: payload.main_goal,
        gender: payload.gender,
        date_of_birth: payload.date_of_birth,
        height: Measurement::cm(height_cm),
        weight: Measurement::kg(weight_kg),
        activity_level: payload.activity_level,
        daily_calorie_goal,
        created_at,
        updated_at: now,
    };
    state.db.upsert_profile(&profile).await?;

    tracing::info!(user_id = %user.user_id, daily_calorie_goal, "Survey saved");

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Get the current user's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub main_goal: Option<MainGoal>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub height: Option<MeasurementInput>,
    pub weight: Option<MeasurementInput>,
    pub activity_level: Option<ActivityLevel>,
}

impl UpdateProfileRequest {
    /// Whether any field feeding the BMR formula changes.
    fn touches_bmr_inputs(&self) -> bool {
        self.gender.is_some()
            || self.date_of_birth.is_some()
            || self.height.is_some()
            || self.weight.is_some()
            || self.activity_level.is_some()
    }
}

/// Partial profile update; recomputes the daily calorie goal when any
/// BMR-relevant field changes.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let mut profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let recompute = payload.touches_bmr_inputs();

    if let Some(main_goal) = payload.main_goal {
        profile.main_goal = main_goal;
    }
    if let Some(gender) = payload.gender {
        profile.gender = gender;
    }
    if let Some(date_of_birth) = payload.date_of_birth {
        profile.date_of_birth = date_of_birth;
    }
    if let Some(height) = &payload.height {
        profile.height = Measurement::cm(height.to_cm()?);
    }
    if let Some(weight) = &payload.weight {
        profile.weight = Measurement::kg(weight.to_kg()?);
    }
    if let Some(activity_level) = payload.activity_level {
        profile.activity_level = activity_level;
    }

    if recompute {
        let metrics = BodyMetrics {
            gender: profile.gender,
            date_of_birth: profile.date_of_birth,
            height_cm: profile.height.value,
            weight_kg: profile.weight.value,
            activity_level: profile.activity_level,
        };
        profile.daily_calorie_goal =
            estimate_daily_calories(&metrics, chrono::Utc::now().date_naive())
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    profile.updated_at = now_utc_millis();
    state.db.upsert_profile(&profile).await?;

    Ok(Json(profile))
}
