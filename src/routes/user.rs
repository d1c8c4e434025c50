// SPDX-License-Identifier: MIT

//! Current user account routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::routes::auth::UserResponse;
use crate::time_utils::now_utc_millis;
use crate::AppState;
use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/user", get(get_user).put(update_user).delete(delete_user))
}

/// Get the current user's account.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let account = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(UserResponse::from(&account)))
}

#[derive(Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Update name and/or email.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    payload.validate()?;

    let mut account = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    if let Some(name) = payload.name {
        account.name = name.trim().to_string();
    }
    if let Some(email) = payload.email {
        let email = email.trim().to_lowercase();
        if email != account.email {
            if state.db.get_user_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
            account.email = email;
        }
    }
    account.updated_at = now_utc_millis();

    state.db.upsert_user(&account).await?;
    Ok(Json(UserResponse::from(&account)))
}

#[derive(Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
}

/// Delete the current user's account and every document it owns.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteUserResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    let deleted_count = state.db.delete_user_data(&user.user_id).await?;
    tracing::info!(user_id = %user.user_id, deleted_count, "Account deleted");

    Ok(Json(DeleteUserResponse {
        message: "Account deleted. All data has been removed.".to_string(),
    }))
}
