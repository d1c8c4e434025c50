// SPDX-License-Identifier: MIT

//! Questionnaire model: immutable onboarding snapshots.

use serde::{Deserialize, Serialize};

use crate::models::profile::{ActivityLevel, Gender, MainGoal};

/// BMI and calorie estimate derived from the answers at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub estimated_calorie_needs: u32,
}

/// One submitted questionnaire stored in Firestore (`questionnaires/{id}`).
///
/// Historical record: never updated after creation, many per user, the most
/// recently created one wins for "latest".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    /// Document id (uuid)
    pub id: String,
    /// Owning user id
    pub user_id: String,
    pub main_goal: MainGoal,
    pub gender: Gender,
    pub birth_date: chrono::NaiveDate,
    /// cm
    pub height: f64,
    /// kg
    pub current_weight: f64,
    /// kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<f64>,
    pub activity_level: ActivityLevel,
    pub derived: DerivedMetrics,
    pub created_at: String,
}
