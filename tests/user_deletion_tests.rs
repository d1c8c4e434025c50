// SPDX-License-Identifier: MIT

//! Integration tests for account deletion.
//!
//! These tests require the Firestore emulator to be running.
//! Run with: ./scripts/test-with-emulator.sh --test user_deletion_tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::NaiveDate;
use nutrilog::models::user::{Role, User};
use nutrilog::models::{
    ActivityLevel, FoodItem, Gender, Goal, GoalType, MainGoal, MealFood, MealLog, MealType,
    Measurement, NutritionPer100g, NutritionTotals, Profile,
};
use nutrilog::models::food::FoodUnit;
use nutrilog::services::NutritionAggregator;
use nutrilog::time_utils::now_utc_millis;
use tower::ServiceExt;

mod common;
use common::test_db;

fn unique_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn test_user(user_id: &str) -> User {
    let now = now_utc_millis();
    User {
        id: user_id.to_string(),
        name: "Delete Me".to_string(),
        email: format!("{}@example.com", user_id),
        password_hash: "unused".to_string(),
        role: Role::User,
        is_email_verified: false,
        last_login_at: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[tokio::test]
async fn test_delete_user_data_removes_all_records() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let now = now_utc_millis();
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    // 1. User account
    db.upsert_user(&test_user(&user_id)).await.unwrap();

    // 2. Profile
    let profile = Profile {
        user_id: user_id.clone(),
        main_goal: MainGoal::Maintenance,
        gender: Gender::Female,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        height: Measurement::cm(165.0),
        weight: Measurement::kg(60.0),
        activity_level: ActivityLevel::Sedentary,
        daily_calorie_goal: 1584,
        created_at: now.clone(),
        updated_at: now.clone(),
    };
    db.upsert_profile(&profile).await.unwrap();

    // 3. Goal
    let goal = Goal {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.clone(),
        goal_type: GoalType::Weight,
        target_weight: None,
        calorie_goal: Some(1800.0),
        protein_goal: None,
        carb_goal: None,
        fat_goal: None,
        fiber_goal: None,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        target_date: None,
        is_active: true,
        created_at: now.clone(),
        updated_at: now.clone(),
    };
    db.upsert_goal(&goal).await.unwrap();

    // 4. Shared food item (must survive the deletion)
    let food = FoodItem {
        id: uuid::Uuid::new_v4().to_string(),
        name: format!("Shared Apple {}", user_id),
        name_lower: format!("shared apple {}", user_id),
        brand: None,
        barcode: None,
        category: Default::default(),
        serving_size: Default::default(),
        nutrition_per_100g: NutritionPer100g {
            calories: 52.0,
            ..Default::default()
        },
        is_verified: false,
        source: Default::default(),
        created_at: now.clone(),
        updated_at: now.clone(),
    };
    db.upsert_food_item(&food).await.unwrap();

    // 5. Meal log
    let meal = MealLog {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.clone(),
        meal_type: MealType::Lunch,
        foods: vec![MealFood {
            food_item_id: food.id.clone(),
            quantity: 150.0,
            unit: FoodUnit::G,
        }],
        total_nutrition: NutritionTotals::default(),
        consumed_at: "2024-03-05T12:30:00.000Z".to_string(),
        notes: None,
        image_url: None,
        created_at: now.clone(),
        updated_at: now,
    };
    db.upsert_meal_log(&meal).await.unwrap();

    // 6. Day-keyed documents via the aggregator
    let aggregator = NutritionAggregator::new(db.clone());
    aggregator.update_daily_record(&user_id, date).await.unwrap();
    aggregator.rebuild_food_log(&user_id, date).await.unwrap();

    // Delete and verify everything owned by the user is gone
    let deleted = db.delete_user_data(&user_id).await.unwrap();
    // user + profile + goal + meal + food log + nutrition record
    assert_eq!(deleted, 6);

    assert!(db.get_user(&user_id).await.unwrap().is_none());
    assert!(db.get_profile(&user_id).await.unwrap().is_none());
    assert!(db.goals_for_user(&user_id).await.unwrap().is_empty());
    assert!(db.meals_for_user(&user_id).await.unwrap().is_empty());
    assert!(db.get_food_log(&user_id, date).await.unwrap().is_none());
    assert!(db.get_nutrition_record(&user_id, date).await.unwrap().is_none());

    // Shared reference data is untouched
    assert!(db.get_food_item(&food.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_user_requires_auth() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_user_route_exists_with_valid_token() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/user")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Offline mock: the handler is reached (500 from the mock DB), the route
    // is wired and authentication passes.
    let status = response.status();
    assert_ne!(status, StatusCode::NOT_FOUND);
    assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_ne!(status, StatusCode::UNAUTHORIZED);
}
