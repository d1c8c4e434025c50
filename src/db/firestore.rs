// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (account storage)
//! - Profiles (one health profile per user)
//! - Questionnaires (immutable onboarding snapshots)
//! - Goals (explicit calorie/macro targets)
//! - Food items (shared reference nutrition data)
//! - Meal logs, food logs and nutrition records (daily tracking)

use std::collections::HashMap;

use futures_util::{stream, StreamExt};

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    FoodItem, FoodLog, Goal, MealLog, NutritionRecord, Profile, Questionnaire, User,
};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore transactions cap at 500 writes.
const BATCH_SIZE: usize = 500;

/// Sentinel appended to a prefix to form an exclusive upper bound for
/// Firestore prefix queries (the highest valid code point in field order).
const PREFIX_UPPER_BOUND: char = '\u{f8ff}';

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Build the composite document id for per-user-per-day documents.
///
/// Keying by user and date makes the uniqueness invariant structural:
/// an upsert can never create a second document for the same day.
pub fn day_doc_id(user_id: &str, date: chrono::NaiveDate) -> String {
    format!("{}_{}", user_id, date.format("%Y-%m-%d"))
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user account by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look a user up by (lowercased) email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        let mut matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(matches.pop())
    }

    /// Create or update a user account.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user's health profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user's health profile.
    ///
    /// The document is keyed by user id, enforcing at most one profile per user.
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Questionnaire Operations ────────────────────────────────

    /// Store an immutable questionnaire snapshot.
    pub async fn add_questionnaire(&self, questionnaire: &Questionnaire) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::QUESTIONNAIRES)
            .document_id(&questionnaire.id)
            .object(questionnaire)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user's questionnaires, newest first.
    pub async fn questionnaires_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Questionnaire>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::QUESTIONNAIRES)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .order_by([(
                "createdAt",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Goal Operations ─────────────────────────────────────────

    /// Create or update a goal.
    pub async fn upsert_goal(&self, goal: &Goal) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::GOALS)
            .document_id(&goal.id)
            .object(goal)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get one goal by id.
    pub async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GOALS)
            .obj()
            .one(goal_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all of a user's goals, newest first.
    ///
    /// Per-user goal counts are small, so date-coverage filtering happens in
    /// memory rather than with composite Firestore indexes.
    pub async fn goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GOALS)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .order_by([(
                "createdAt",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a goal document.
    pub async fn delete_goal(&self, goal_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::GOALS)
            .document_id(goal_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Food Item Operations ────────────────────────────────────

    /// Create or update a food reference record.
    pub async fn upsert_food_item(&self, item: &FoodItem) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FOOD_ITEMS)
            .document_id(&item.id)
            .object(item)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get one food item by id.
    pub async fn get_food_item(&self, item_id: &str) -> Result<Option<FoodItem>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FOOD_ITEMS)
            .obj()
            .one(item_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch a batch of food items by id, returned as an id → item map.
    ///
    /// Uses concurrent reads with a limit to avoid overloading Firestore.
    /// Ids that do not resolve are simply absent from the map.
    pub async fn get_food_items(
        &self,
        item_ids: &[String],
    ) -> Result<HashMap<String, FoodItem>, AppError> {
        let client = self.get_client()?;

        let results: Vec<Result<Option<FoodItem>, AppError>> = stream::iter(item_ids.to_vec())
            .map(|item_id| async move {
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::FOOD_ITEMS)
                    .obj()
                    .one(&item_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut items = HashMap::new();
        for result in results {
            if let Some(item) = result? {
                items.insert(item.id.clone(), item);
            }
        }
        Ok(items)
    }

    /// Case-insensitive exact lookup by name.
    pub async fn find_food_by_name(&self, name: &str) -> Result<Option<FoodItem>, AppError> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<FoodItem> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::FOOD_ITEMS)
            .filter(move |q| q.field("nameLower").eq(name_lower.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(matches.pop())
    }

    /// Prefix search on the lowercased name.
    ///
    /// Firestore has no full-text search; the caller gets prefix matching on
    /// the normalized name field, which covers the mobile client's
    /// search-as-you-type use.
    pub async fn search_food(&self, query: &str, limit: u32) -> Result<Vec<FoodItem>, AppError> {
        let prefix = query.to_lowercase();
        let upper = format!("{}{}", prefix, PREFIX_UPPER_BOUND);

        self.get_client()?
            .fluent()
            .select()
            .from(collections::FOOD_ITEMS)
            .filter(move |q| {
                q.for_all([
                    q.field("nameLower").greater_than_or_equal(prefix.clone()),
                    q.field("nameLower").less_than(upper.clone()),
                ])
            })
            .order_by([(
                "nameLower",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Meal Log Operations ─────────────────────────────────────

    /// Create or update a meal log.
    pub async fn upsert_meal_log(&self, meal: &MealLog) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MEAL_LOGS)
            .document_id(&meal.id)
            .object(meal)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get one meal log by id.
    pub async fn get_meal_log(&self, meal_id: &str) -> Result<Option<MealLog>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::MEAL_LOGS)
            .obj()
            .one(meal_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a meal log document.
    pub async fn delete_meal_log(&self, meal_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::MEAL_LOGS)
            .document_id(meal_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user's meals with `consumedAt` inside [start, end], oldest first.
    ///
    /// Bounds are stored-format RFC3339 strings (see `time_utils`), so the
    /// range filter is a plain string comparison on Firestore's side.
    pub async fn meals_for_user_between(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<MealLog>, AppError> {
        let user_id = user_id.to_string();
        let start = start.to_string();
        let end = end.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::MEAL_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    q.field("consumedAt").greater_than_or_equal(start.clone()),
                    q.field("consumedAt").less_than_or_equal(end.clone()),
                ])
            })
            .order_by([(
                "consumedAt",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all of a user's meals, newest first.
    pub async fn meals_for_user(&self, user_id: &str) -> Result<Vec<MealLog>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::MEAL_LOGS)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .order_by([(
                "consumedAt",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Food Log Operations ─────────────────────────────────────

    /// Get the per-day food log pointer document, if present.
    pub async fn get_food_log(
        &self,
        user_id: &str,
        date: chrono::NaiveDate,
    ) -> Result<Option<FoodLog>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FOOD_LOGS)
            .obj()
            .one(&day_doc_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update the per-day food log pointer document.
    pub async fn upsert_food_log(&self, log: &FoodLog) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FOOD_LOGS)
            .document_id(day_doc_id(&log.user_id, log.date))
            .object(log)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Nutrition Record Operations ─────────────────────────────

    /// Get the computed daily record, if present.
    pub async fn get_nutrition_record(
        &self,
        user_id: &str,
        date: chrono::NaiveDate,
    ) -> Result<Option<NutritionRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::NUTRITION_RECORDS)
            .obj()
            .one(&day_doc_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace the computed daily record.
    pub async fn upsert_nutrition_record(&self, record: &NutritionRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::NUTRITION_RECORDS)
            .document_id(day_doc_id(&record.user_id, record.date))
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user's records with `date` inside [start, end], ascending.
    pub async fn nutrition_records_between(
        &self,
        user_id: &str,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<NutritionRecord>, AppError> {
        let user_id = user_id.to_string();
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::NUTRITION_RECORDS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    q.field("date").greater_than_or_equal(start.clone()),
                    q.field("date").less_than_or_equal(end.clone()),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Data Deletion (GDPR) ───────────────────────────────

    /// Delete a batch of documents in transactional chunks.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    /// Fetch every document a user owns in `collection`.
    async fn all_for_user<T>(&self, collection: &str, user_id: &str) -> Result<Vec<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete ALL data for a user (GDPR compliance).
    ///
    /// Deletes from all collections:
    /// - `meal_logs`, `goals`, `questionnaires` (query by userId)
    /// - `food_logs`, `nutrition_records` (query by userId, day-keyed ids)
    /// - `profiles/{user_id}` and `users/{user_id}`
    ///
    /// Shared `food_items` are untouched; they carry no user data.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        let meals: Vec<MealLog> = self.all_for_user(collections::MEAL_LOGS, user_id).await?;
        let count = meals.len();
        self.batch_delete(&meals, collections::MEAL_LOGS, |meal: &MealLog| {
            meal.id.clone()
        })
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted meal logs");

        let food_logs: Vec<FoodLog> = self.all_for_user(collections::FOOD_LOGS, user_id).await?;
        let count = food_logs.len();
        self.batch_delete(&food_logs, collections::FOOD_LOGS, |log: &FoodLog| {
            day_doc_id(&log.user_id, log.date)
        })
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted food logs");

        let records: Vec<NutritionRecord> = self
            .all_for_user(collections::NUTRITION_RECORDS, user_id)
            .await?;
        let count = records.len();
        self.batch_delete(
            &records,
            collections::NUTRITION_RECORDS,
            |record: &NutritionRecord| day_doc_id(&record.user_id, record.date),
        )
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted nutrition records");

        let goals: Vec<Goal> = self.all_for_user(collections::GOALS, user_id).await?;
        let count = goals.len();
        self.batch_delete(&goals, collections::GOALS, |goal: &Goal| goal.id.clone())
            .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted goals");

        let questionnaires: Vec<Questionnaire> = self
            .all_for_user(collections::QUESTIONNAIRES, user_id)
            .await?;
        let count = questionnaires.len();
        self.batch_delete(
            &questionnaires,
            collections::QUESTIONNAIRES,
            |q: &Questionnaire| q.id.clone(),
        )
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted questionnaires");

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PROFILES)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        deleted_count += 1;
        tracing::debug!(user_id, "Deleted profile");

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        deleted_count += 1;
        tracing::debug!(user_id, "Deleted user account");

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_doc_id_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(day_doc_id("user-1", date), "user-1_2024-03-05");
    }
}
