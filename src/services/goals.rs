// SPDX-License-Identifier: MIT

//! Goal resolution: which calorie/macro targets apply to a user on a date.
//!
//! Precedence: the most recently created active goal covering the date, if it
//! carries any explicit target; otherwise a split derived from the profile's
//! daily calorie goal; otherwise hardcoded defaults. Resolution never fails,
//! it only degrades.

use chrono::NaiveDate;

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{Goal, GoalTargets};

/// Base calories used when neither a goal nor a profile exists.
pub const DEFAULT_BASE_CALORIES: f64 = 2000.0;

/// Fraction of calories from protein in the fallback split.
const PROTEIN_CALORIE_SHARE: f64 = 0.15;
/// Fraction of calories from carbs in the fallback split.
const CARB_CALORIE_SHARE: f64 = 0.50;
/// Fraction of calories from fat in the fallback split.
const FAT_CALORIE_SHARE: f64 = 0.35;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Pick the goal effective on `date` from a newest-first goal list.
///
/// The list must be ordered by creation time descending (as
/// `FirestoreDb::goals_for_user` returns it); the first covering match is
/// therefore the most recently created one.
pub fn select_current(goals: &[Goal], date: NaiveDate) -> Option<&Goal> {
    goals.iter().find(|goal| goal.covers(date))
}

/// Targets from the goal effective on `date`, if that goal carries any.
///
/// Only the selected (most recently created covering) goal is consulted: a
/// covering goal without targets yields `None`, it does not let an older
/// goal's targets through.
pub fn targets_from_goals(goals: &[Goal], date: NaiveDate) -> Option<GoalTargets> {
    select_current(goals, date)
        .filter(|goal| goal.has_any_target())
        .map(targets_from_goal)
}

/// Targets taken verbatim from an explicit goal.
///
/// Individually missing fields stay unset; they are NOT defaulted from the
/// profile in this path.
pub fn targets_from_goal(goal: &Goal) -> GoalTargets {
    GoalTargets {
        calories: goal.calorie_goal,
        protein: goal.protein_goal,
        carbs: goal.carb_goal,
        fat: goal.fat_goal,
    }
}

/// Profile-derived fallback split: 15% protein, 50% carbs, 35% fat.
pub fn fallback_targets(daily_calorie_goal: Option<u32>) -> GoalTargets {
    let base = daily_calorie_goal.map_or(DEFAULT_BASE_CALORIES, f64::from);
    GoalTargets {
        calories: Some(base),
        protein: Some(base * PROTEIN_CALORIE_SHARE / KCAL_PER_GRAM_PROTEIN),
        carbs: Some(base * CARB_CALORIE_SHARE / KCAL_PER_GRAM_CARBS),
        fat: Some(base * FAT_CALORIE_SHARE / KCAL_PER_GRAM_FAT),
    }
}

/// Resolves the targets effective for a user on a given date.
#[derive(Clone)]
pub struct GoalResolver {
    db: FirestoreDb,
}

impl GoalResolver {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Resolve targets for `user_id` on `date`.
    pub async fn resolve(&self, user_id: &str, date: NaiveDate) -> Result<GoalTargets> {
        let goals = self.db.goals_for_user(user_id).await?;

        if let Some(targets) = targets_from_goals(&goals, date) {
            tracing::debug!(user_id, "Resolved targets from explicit goal");
            return Ok(targets);
        }

        let profile = self.db.get_profile(user_id).await?;
        let daily_calorie_goal = profile.map(|p| p.daily_calorie_goal);
        tracing::debug!(
            user_id,
            has_profile = daily_calorie_goal.is_some(),
            "Resolved targets from profile fallback"
        );
        Ok(fallback_targets(daily_calorie_goal))
    }

    /// The goal currently effective for a user, if any (explicit goals only).
    pub async fn current_goal(&self, user_id: &str, date: NaiveDate) -> Result<Option<Goal>> {
        let goals = self.db.goals_for_user(user_id).await?;
        Ok(select_current(&goals, date).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalType;

    fn goal(id: &str, created_at: &str, calorie_goal: Option<f64>) -> Goal {
        Goal {
            id: id.to_string(),
            user_id: "u1".to_string(),
            goal_type: GoalType::Weight,
            target_weight: None,
            calorie_goal,
            protein_goal: None,
            carb_goal: None,
            fat_goal: None,
            fiber_goal: None,
            start_date: "2024-01-01".parse().unwrap(),
            target_date: None,
            is_active: true,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_newest_covering_goal_wins() {
        // Newest first, as the db query returns them
        let goals = vec![
            goal("newer", "2024-02-01T00:00:00.000Z", Some(1800.0)),
            goal("older", "2024-01-01T00:00:00.000Z", Some(2200.0)),
        ];

        let selected = select_current(&goals, date("2024-03-01")).unwrap();
        assert_eq!(selected.id, "newer");
    }

    #[test]
    fn test_expired_goal_skipped() {
        let mut expired = goal("expired", "2024-02-01T00:00:00.000Z", Some(1800.0));
        expired.target_date = Some(date("2024-02-15"));
        let goals = vec![expired, goal("open", "2024-01-01T00:00:00.000Z", Some(2200.0))];

        let selected = select_current(&goals, date("2024-03-01")).unwrap();
        assert_eq!(selected.id, "open");
    }

    #[test]
    fn test_no_covering_goal() {
        let goals = vec![goal("future", "2024-01-01T00:00:00.000Z", Some(1800.0))];
        assert!(select_current(&goals, date("2023-12-01")).is_none());
    }

    #[test]
    fn test_targetless_newest_goal_forces_profile_fallback() {
        // Only the most recently created covering goal is consulted. When it
        // has no targets, resolution falls back to the profile split even if
        // an older covering goal does carry targets.
        let goals = vec![
            goal("targetless", "2024-02-01T00:00:00.000Z", None),
            goal("older", "2024-01-01T00:00:00.000Z", Some(2200.0)),
        ];

        assert_eq!(targets_from_goals(&goals, date("2024-03-01")), None);
    }

    #[test]
    fn test_targets_from_goals_uses_newest_covering_goal() {
        let goals = vec![
            goal("newer", "2024-02-01T00:00:00.000Z", Some(1800.0)),
            goal("older", "2024-01-01T00:00:00.000Z", Some(2200.0)),
        ];

        let targets = targets_from_goals(&goals, date("2024-03-01")).unwrap();
        assert_eq!(targets.calories, Some(1800.0));
    }

    #[test]
    fn test_explicit_goal_fields_not_defaulted() {
        let g = goal("g", "2024-01-01T00:00:00.000Z", Some(1800.0));
        let targets = targets_from_goal(&g);

        assert_eq!(targets.calories, Some(1800.0));
        assert_eq!(targets.protein, None);
        assert_eq!(targets.carbs, None);
        assert_eq!(targets.fat, None);
    }

    #[test]
    fn test_fallback_split_from_profile() {
        let targets = fallback_targets(Some(2000));

        assert_eq!(targets.calories, Some(2000.0));
        assert_eq!(targets.protein, Some(75.0)); // 2000 * 0.15 / 4
        assert_eq!(targets.carbs, Some(250.0)); // 2000 * 0.50 / 4
        assert!((targets.fat.unwrap() - 77.777_777_777_777_78).abs() < 1e-9); // 2000 * 0.35 / 9
    }

    #[test]
    fn test_fallback_without_profile_uses_default_base() {
        let targets = fallback_targets(None);
        assert_eq!(targets.calories, Some(2000.0));
    }
}
