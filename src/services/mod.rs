// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod aggregator;
pub mod estimator;
pub mod goals;
pub mod password;
pub mod scaler;

pub use aggregator::NutritionAggregator;
pub use estimator::{BodyMetrics, EstimateError};
pub use goals::GoalResolver;
