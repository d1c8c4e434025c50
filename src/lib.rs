// SPDX-License-Identifier: MIT

//! Nutrilog: diet-tracking backend API
//!
//! This crate provides the backend for a diet-tracking mobile client:
//! profiles and onboarding questionnaires, goals, food reference data, meal
//! logging, and the daily nutrition aggregation that turns meal logs into
//! per-day summaries with goal-achievement flags.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::NutritionAggregator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub aggregator: NutritionAggregator,
}
