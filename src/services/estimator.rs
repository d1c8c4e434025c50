// SPDX-License-Identifier: MIT

//! BMR and daily calorie estimation (Mifflin-St Jeor).
//!
//! Pure functions of their inputs: the reference date is passed explicitly so
//! the same inputs always produce the same output.

use chrono::{Datelike, NaiveDate};

use crate::models::{ActivityLevel, Gender};

/// Estimation input errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("Height must be positive")]
    InvalidHeight,

    #[error("Weight must be positive")]
    InvalidWeight,
}

/// The profile attributes the estimator needs.
#[derive(Debug, Clone, Copy)]
pub struct BodyMetrics {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

/// Age in whole years: reference year minus birth year.
///
/// Whether the birthday has already occurred in the reference year is
/// deliberately ignored; a one-year age skew moves the estimate by only
/// 5 kcal of BMR.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - date_of_birth.year()
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor).
pub fn basal_metabolic_rate(metrics: &BodyMetrics, today: NaiveDate) -> Result<f64, EstimateError> {
    if metrics.height_cm <= 0.0 {
        return Err(EstimateError::InvalidHeight);
    }
    if metrics.weight_kg <= 0.0 {
        return Err(EstimateError::InvalidWeight);
    }

    let age = age_in_years(metrics.date_of_birth, today);
    let gender_offset = match metrics.gender {
        Gender::Male => 5.0,
        Gender::Female | Gender::Other => -161.0,
    };

    Ok(10.0 * metrics.weight_kg + 6.25 * metrics.height_cm - 5.0 * f64::from(age) + gender_offset)
}

/// Daily calorie goal: BMR scaled by the activity multiplier, rounded to the
/// nearest whole kcal.
pub fn estimate_daily_calories(
    metrics: &BodyMetrics,
    today: NaiveDate,
) -> Result<u32, EstimateError> {
    let bmr = basal_metabolic_rate(metrics, today)?;
    let calories = (bmr * metrics.activity_level.multiplier()).round();
    Ok(calories.max(0.0) as u32)
}

/// Body mass index (kg/m²), rounded to two decimals.
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> Result<f64, EstimateError> {
    if height_cm <= 0.0 {
        return Err(EstimateError::InvalidHeight);
    }
    if weight_kg <= 0.0 {
        return Err(EstimateError::InvalidWeight);
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Ok((bmi * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(
        gender: Gender,
        birth_year: i32,
        height_cm: f64,
        weight_kg: f64,
        activity_level: ActivityLevel,
    ) -> BodyMetrics {
        BodyMetrics {
            gender,
            date_of_birth: NaiveDate::from_ymd_opt(birth_year, 6, 15).unwrap(),
            height_cm,
            weight_kg,
            activity_level,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_sedentary_female_scenario() {
        // BMR = 10*60 + 6.25*165 - 5*30 - 161 = 1320.25; * 1.2 = 1584.3 -> 1584
        let m = metrics(Gender::Female, 1994, 165.0, 60.0, ActivityLevel::Sedentary);
        let bmr = basal_metabolic_rate(&m, today()).unwrap();
        assert_eq!(bmr, 1320.25);
        assert_eq!(estimate_daily_calories(&m, today()).unwrap(), 1584);
    }

    #[test]
    fn test_male_offset() {
        let female = metrics(Gender::Female, 1994, 180.0, 80.0, ActivityLevel::Sedentary);
        let male = metrics(Gender::Male, 1994, 180.0, 80.0, ActivityLevel::Sedentary);

        let diff = basal_metabolic_rate(&male, today()).unwrap()
            - basal_metabolic_rate(&female, today()).unwrap();
        assert_eq!(diff, 166.0);
    }

    #[test]
    fn test_deterministic() {
        let m = metrics(Gender::Male, 1990, 178.0, 75.0, ActivityLevel::ModeratelyActive);
        let first = estimate_daily_calories(&m, today()).unwrap();
        let second = estimate_daily_calories(&m, today()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_monotonic_in_activity_multiplier() {
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::LightlyActive,
            ActivityLevel::ModeratelyActive,
            ActivityLevel::VeryActive,
            ActivityLevel::ExtraActive,
        ];

        let estimates: Vec<u32> = levels
            .iter()
            .map(|&level| {
                let m = metrics(Gender::Male, 1990, 178.0, 75.0, level);
                estimate_daily_calories(&m, today()).unwrap()
            })
            .collect();

        for pair in estimates.windows(2) {
            assert!(pair[0] < pair[1], "estimates not increasing: {:?}", estimates);
        }
    }

    #[test]
    fn test_age_ignores_birthday() {
        // Born December 31st: still counted as a full year on January 1st.
        let dob = NaiveDate::from_ymd_opt(1990, 12, 31).unwrap();
        assert_eq!(age_in_years(dob, today()), 34);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let m = metrics(Gender::Male, 1990, 0.0, 75.0, ActivityLevel::Sedentary);
        assert_eq!(
            basal_metabolic_rate(&m, today()).unwrap_err(),
            EstimateError::InvalidHeight
        );

        let m = metrics(Gender::Male, 1990, 178.0, -3.0, ActivityLevel::Sedentary);
        assert_eq!(
            basal_metabolic_rate(&m, today()).unwrap_err(),
            EstimateError::InvalidWeight
        );
    }

    #[test]
    fn test_bmi() {
        // 60 kg at 165 cm -> 22.038... -> 22.04
        assert_eq!(body_mass_index(165.0, 60.0).unwrap(), 22.04);
        assert!(body_mass_index(0.0, 60.0).is_err());
    }
}
