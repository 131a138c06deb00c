//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// User database model
///
/// Provider identity blocks are flattened into per-provider columns. The
/// password hash and provider tokens never serialize into API responses.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_artist: i64,
    pub google_id: Option<String>,
    #[serde(skip_serializing)]
    pub google_access_token: Option<String>,
    #[serde(skip_serializing)]
    pub google_refresh_token: Option<String>,
    #[serde(skip_serializing)]
    pub google_token_ttl: Option<i64>,
    #[serde(skip_serializing)]
    pub google_token_issued_at: Option<String>,
    pub facebook_id: Option<String>,
    #[serde(skip_serializing)]
    pub facebook_access_token: Option<String>,
    #[serde(skip_serializing)]
    pub facebook_token_ttl: Option<i64>,
    #[serde(skip_serializing)]
    pub facebook_token_issued_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// POST /api/signup request body. Fields default so that a missing field
/// reaches the validator (and a 400) instead of failing body extraction.
#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}
