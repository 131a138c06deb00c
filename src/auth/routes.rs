//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/signup` - Password signup, returns a bearer token
/// - `GET /api/login` - Basic-auth login, returns a bearer token
/// - `GET /api/auth/google` - Start the Google OAuth flow
/// - `GET /api/auth/facebook` - Start the Facebook OAuth flow
/// - `GET /api/auth/oauth_callback` - Google OAuth callback
/// - `GET /api/auth/facebook_oauth_callback` - Facebook OAuth callback
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", get(handlers::login))
        .route("/api/auth/google", get(handlers::google_login))
        .route("/api/auth/facebook", get(handlers::facebook_login))
        .route("/api/auth/oauth_callback", get(handlers::google_callback))
        .route(
            "/api/auth/facebook_oauth_callback",
            get(handlers::facebook_callback),
        )
}
