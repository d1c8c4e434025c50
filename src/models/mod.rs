// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod food;
pub mod goal;
pub mod meal;
pub mod nutrition;
pub mod profile;
pub mod questionnaire;
pub mod user;

pub use food::{FoodCategory, FoodItem, FoodSource, FoodUnit, NutritionPer100g};
pub use goal::{Goal, GoalType};
pub use meal::{MealFood, MealLog, MealType, NutritionTotals};
pub use nutrition::{Achievements, FoodLog, GoalTargets, MealBreakdown, NutritionRecord};
pub use profile::{ActivityLevel, Gender, MainGoal, Measurement, Profile};
pub use questionnaire::Questionnaire;
pub use user::User;
