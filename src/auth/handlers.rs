//! Authentication handlers

use axum::extract::{Extension, Json, Query};
use axum::response::Redirect;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::extractors::BasicCredentials;
use super::models::{Claims, SignupRequest, User};
use super::validators::SignupValidator;
use crate::common::{generate_user_id, safe_email_log, safe_token_log, ApiError, AppState, Validator};
use crate::services::oauth::{FacebookOAuth, GoogleOAuth, Provider, ProviderProfile};

/// Where the browser lands after a successful OAuth login; the token rides
/// in the URL fragment for the frontend to pick up.
const OAUTH_SUCCESS_REDIRECT: &str = "/#/home?token=";
/// Unauthenticated landing state for any OAuth failure.
const OAUTH_FAILURE_REDIRECT: &str = "/";

// ============================================================================
// Token issuance and validation
// ============================================================================

/// Mint a stateless bearer token bound to a user id, valid for 24 hours.
pub fn issue_token(user_id: &str, jwt_secret: &str) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "JWT encoding error");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Validate a bearer token by signature and expiry, returning its claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT validation failed");
        ApiError::Unauthorized("invalid token".to_string())
    })?;

    Ok(token_data.claims)
}

// ============================================================================
// Signup and login
// ============================================================================

/// POST /api/signup
///
/// Creates a password-authenticated user and returns the bearer token as a
/// bare string in the response body.
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<SignupRequest>,
) -> Result<String, ApiError> {
    let state = state_lock.read().await.clone();
    register_user(&state.db, request, &state.jwt_secret).await
}

/// GET /api/login
///
/// Basic-auth login. Missing users, OAuth-only accounts, and wrong
/// passwords all fail with the same message.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    credentials: BasicCredentials,
) -> Result<String, ApiError> {
    let state = state_lock.read().await.clone();
    verify_login(
        &state.db,
        &credentials.username,
        &credentials.password,
        &state.jwt_secret,
    )
    .await
}

/// Validate a signup request, persist the user, and mint its first token.
/// Validation runs before any write, so nothing persists on a 400.
pub async fn register_user(
    db: &SqlitePool,
    request: SignupRequest,
    jwt_secret: &str,
) -> Result<String, ApiError> {
    let validation_result = SignupValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    // Validator guarantees the password is present past this point
    let password = request.password.as_deref().unwrap_or_default();
    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::InternalServer("password hashing failed".to_string())
    })?;

    let user = insert_local_user(db, &request.username, &request.email, &password_hash).await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User account created via signup"
    );

    issue_token(&user.id, jwt_secret)
}

/// Check basic-auth credentials against the stored hash and mint a token.
pub async fn verify_login(
    db: &SqlitePool,
    username: &str,
    password: &str,
    jwt_secret: &str,
) -> Result<String, ApiError> {
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = user.ok_or_else(|| {
        warn!(username = %username, "Login failed: unknown username");
        ApiError::Unauthorized("invalid username or password".to_string())
    })?;

    let password_hash = user.password_hash.as_deref().ok_or_else(|| {
        warn!(user_id = %user.id, "Login failed: OAuth-only account");
        ApiError::Unauthorized("invalid username or password".to_string())
    })?;

    let verified = bcrypt::verify(password, password_hash).map_err(|e| {
        error!(error = %e, "Password verification failed");
        ApiError::InternalServer("password verification failed".to_string())
    })?;

    if !verified {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized(
            "invalid username or password".to_string(),
        ));
    }

    info!(user_id = %user.id, "User logged in");

    issue_token(&user.id, jwt_secret)
}

/// Insert a password-authenticated user and fetch the stored row back.
pub async fn insert_local_user(
    db: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, ApiError> {
    let id = generate_user_id();

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(db)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::Conflict("username or email already in use".to_string())
        } else {
            ApiError::DatabaseError(e)
        }
    })?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)
}

// ============================================================================
// OAuth identity resolution
// ============================================================================

/// Resolve a provider-supplied profile to a local user.
///
/// Email is the sole cross-provider identity key: an existing user is
/// returned untouched (the stored identity block is not refreshed, and a
/// second provider's block is never attached), an unseen email creates a
/// user whose username and email are both the provider email with only the
/// calling provider's block populated.
pub async fn resolve_oauth_user(
    db: &SqlitePool,
    profile: &ProviderProfile,
) -> Result<User, ApiError> {
    let existing: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&profile.email)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if let Some(user) = existing {
        debug!(
            user_id = %user.id,
            provider = %profile.provider.as_str(),
            "OAuth login resolved to existing user"
        );
        return Ok(user);
    }

    let id = generate_user_id();
    let issued_at = Utc::now().to_rfc3339();

    match profile.provider {
        Provider::Google => {
            sqlx::query(
                r#"
                INSERT INTO users (
                    id, username, email,
                    google_id, google_access_token, google_refresh_token,
                    google_token_ttl, google_token_issued_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&profile.email)
            .bind(&profile.email)
            .bind(&profile.provider_user_id)
            .bind(&profile.access_token)
            .bind(profile.refresh_token.as_deref())
            .bind(profile.token_ttl)
            .bind(&issued_at)
            .execute(db)
            .await
        }
        Provider::Facebook => {
            sqlx::query(
                r#"
                INSERT INTO users (
                    id, username, email,
                    facebook_id, facebook_access_token,
                    facebook_token_ttl, facebook_token_issued_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&profile.email)
            .bind(&profile.email)
            .bind(&profile.provider_user_id)
            .bind(&profile.access_token)
            .bind(profile.token_ttl)
            .bind(&issued_at)
            .execute(db)
            .await
        }
    }
    .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %id,
        email = %safe_email_log(&profile.email),
        provider = %profile.provider.as_str(),
        "New user account created via OAuth"
    );

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)
}

async fn oauth_login(state: &AppState, profile: ProviderProfile) -> Result<String, ApiError> {
    let user = resolve_oauth_user(&state.db, &profile).await?;
    issue_token(&user.id, &state.jwt_secret)
}

/// GET /api/auth/google - redirect the browser to Google's consent screen
pub async fn google_login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Redirect {
    let state = state_lock.read().await.clone();
    let google = GoogleOAuth::new(state.http.clone(), state.google_oauth.clone());
    Redirect::to(&google.authorization_url())
}

/// GET /api/auth/facebook - redirect the browser to Facebook's consent screen
pub async fn facebook_login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Redirect {
    let state = state_lock.read().await.clone();
    let facebook = FacebookOAuth::new(state.http.clone(), state.facebook_oauth.clone());
    Redirect::to(&facebook.authorization_url())
}

/// GET /api/auth/oauth_callback - Google OAuth callback
///
/// Browser-facing: every failure redirects to the unauthenticated landing
/// page instead of surfacing a JSON error.
pub async fn google_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    let state = state_lock.read().await.clone();

    if let Some(provider_error) = params.get("error") {
        warn!(oauth_error = %provider_error, "Google OAuth returned error");
        return Redirect::to(OAUTH_FAILURE_REDIRECT);
    }

    let code = match params.get("code") {
        Some(c) => c,
        None => {
            warn!("Google OAuth callback missing authorization code");
            return Redirect::to(OAUTH_FAILURE_REDIRECT);
        }
    };

    let google = GoogleOAuth::new(state.http.clone(), state.google_oauth.clone());
    let profile = match google.authenticate(code).await {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Google OAuth authentication failed");
            return Redirect::to(OAUTH_FAILURE_REDIRECT);
        }
    };

    finish_oauth_callback(&state, profile).await
}

/// GET /api/auth/facebook_oauth_callback - Facebook OAuth callback
pub async fn facebook_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    let state = state_lock.read().await.clone();

    if let Some(provider_error) = params.get("error") {
        warn!(oauth_error = %provider_error, "Facebook OAuth returned error");
        return Redirect::to(OAUTH_FAILURE_REDIRECT);
    }

    let code = match params.get("code") {
        Some(c) => c,
        None => {
            warn!("Facebook OAuth callback missing authorization code");
            return Redirect::to(OAUTH_FAILURE_REDIRECT);
        }
    };

    let facebook = FacebookOAuth::new(state.http.clone(), state.facebook_oauth.clone());
    let profile = match facebook.authenticate(code).await {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Facebook OAuth authentication failed");
            return Redirect::to(OAUTH_FAILURE_REDIRECT);
        }
    };

    finish_oauth_callback(&state, profile).await
}

async fn finish_oauth_callback(state: &AppState, profile: ProviderProfile) -> Redirect {
    let provider = profile.provider;

    match oauth_login(state, profile).await {
        Ok(token) => {
            debug!(
                provider = %provider.as_str(),
                token = %safe_token_log(&token),
                "OAuth login succeeded, redirecting with token"
            );
            Redirect::to(&format!(
                "{}{}",
                OAUTH_SUCCESS_REDIRECT,
                urlencoding::encode(&token)
            ))
        }
        Err(e) => {
            error!(error = %e, provider = %provider.as_str(), "OAuth login failed");
            Redirect::to(OAUTH_FAILURE_REDIRECT)
        }
    }
}
