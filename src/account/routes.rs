// src/account/routes.rs

use axum::{
    routing::{delete, put},
    Router,
};

use super::handlers;

/// Creates and returns the account management router
///
/// # Routes
/// - `DELETE /api/user/deleteAccount` - Delete the account and everything it owns
/// - `PUT /api/user/updateEmail` - Partial profile update
/// - `PUT /api/user/becomeArtist` - Partial profile update
/// - `PUT /api/user/updateUsername` - Partial profile update
/// - `PUT /api/user/updatePassword` - Partial profile update
pub fn account_routes() -> Router {
    Router::new()
        .route("/api/user/deleteAccount", delete(handlers::delete_account))
        .route("/api/user/updateEmail", put(handlers::update_email))
        .route("/api/user/becomeArtist", put(handlers::become_artist))
        .route("/api/user/updateUsername", put(handlers::update_username))
        .route("/api/user/updatePassword", put(handlers::update_password))
}
