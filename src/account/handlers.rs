// src/account/handlers.rs

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::UpdateUserRequest;
use super::services::AccountService;
use crate::auth::models::User;
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState};

/// DELETE /api/user/deleteAccount
///
/// Runs the full deletion cascade for the authenticated account and answers
/// 204 only once every record and blob is gone.
pub async fn delete_account(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    info!(
        user_id = %authed.id,
        email = %safe_email_log(&authed.email),
        "Account deletion requested"
    );

    let service = AccountService::new(state.db.clone(), state.object_store.clone());
    service.delete_account(&authed.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/user/updateEmail
pub async fn update_email(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    info!(user_id = %authed.id, "Email update requested");
    apply_update(&state_lock, &authed, request).await
}

/// PUT /api/user/becomeArtist
pub async fn become_artist(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    info!(user_id = %authed.id, "Artist upgrade requested");
    apply_update(&state_lock, &authed, request).await
}

/// PUT /api/user/updateUsername
pub async fn update_username(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    info!(
        user_id = %authed.id,
        current_username = %authed.username,
        "Username update requested"
    );
    apply_update(&state_lock, &authed, request).await
}

/// PUT /api/user/updatePassword
pub async fn update_password(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    info!(user_id = %authed.id, "Password update requested");
    apply_update(&state_lock, &authed, request).await
}

// All four PUT routes accept the same partial-field body and funnel into
// one validated update path.
async fn apply_update(
    state_lock: &Arc<RwLock<AppState>>,
    authed: &AuthedUser,
    request: UpdateUserRequest,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let service = AccountService::new(state.db.clone(), state.object_store.clone());
    let user = service.update_user(&authed.id, request).await?;

    Ok(Json(user))
}
