// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Health profiles (keyed by user id, one per user)
    pub const PROFILES: &str = "profiles";
    pub const QUESTIONNAIRES: &str = "questionnaires";
    pub const GOALS: &str = "goals";
    /// Shared food reference table
    pub const FOOD_ITEMS: &str = "food_items";
    pub const MEAL_LOGS: &str = "meal_logs";
    /// Per-day meal pointers (keyed by `{user_id}_{date}`)
    pub const FOOD_LOGS: &str = "food_logs";
    /// Per-day computed summaries (keyed by `{user_id}_{date}`)
    pub const NUTRITION_RECORDS: &str = "nutrition_records";
}
