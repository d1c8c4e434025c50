// SPDX-License-Identifier: MIT

//! Explicit nutrition goal model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalType {
    Weight,
    Maintenance,
    Recomposition,
    CustomMacros,
}

/// A user-defined, possibly time-bounded override of calorie/macro targets.
///
/// A user may have any number of goals; the "current" goal for a date is the
/// most recently created active goal whose [startDate, targetDate] range
/// covers that date (an absent targetDate means open-ended).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Document id (uuid)
    pub id: String,
    /// Owning user id
    pub user_id: String,
    pub goal_type: GoalType,
    /// Target body weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carb_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_goal: Option<f64>,
    pub start_date: chrono::NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Goal {
    /// Whether the goal specifies at least one calorie/macro target.
    pub fn has_any_target(&self) -> bool {
        self.calorie_goal.is_some()
            || self.protein_goal.is_some()
            || self.carb_goal.is_some()
            || self.fat_goal.is_some()
    }

    /// Whether the goal is effective on the given date.
    pub fn covers(&self, date: chrono::NaiveDate) -> bool {
        self.is_active
            && self.start_date <= date
            && self.target_date.map_or(true, |target| target >= date)
    }
}
