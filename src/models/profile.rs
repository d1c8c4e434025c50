// SPDX-License-Identifier: MIT

//! User health profile model.
//!
//! Exactly one profile exists per user: the profile document is keyed by the
//! user id, so repeated survey submissions upsert the same document.

use serde::{Deserialize, Serialize};

/// Primary objective the user selected during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainGoal {
    WeightLoss,
    WeightGain,
    Maintenance,
    MuscleGain,
    HealthyEating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Self-reported activity level, mapped to a fixed BMR multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    /// Multiplier applied to BMR to estimate total daily energy expenditure.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

/// A stored measurement with its unit, normalized on write (cm / kg).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    pub fn cm(value: f64) -> Self {
        Self {
            value,
            unit: "cm".to_string(),
        }
    }

    pub fn kg(value: f64) -> Self {
        Self {
            value,
            unit: "kg".to_string(),
        }
    }
}

/// Health profile stored in Firestore (`profiles/{user_id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Owning user id (also the document id)
    pub user_id: String,
    pub main_goal: MainGoal,
    pub gender: Gender,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: chrono::NaiveDate,
    /// Height, normalized to cm
    pub height: Measurement,
    /// Weight, normalized to kg
    pub weight: Measurement,
    pub activity_level: ActivityLevel,
    /// Cached Mifflin-St Jeor estimate, recomputed on relevant changes
    pub daily_calorie_goal: u32,
    pub created_at: String,
    pub updated_at: String,
}
