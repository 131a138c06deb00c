//! Account management data models

use serde::Deserialize;

/// Partial user update accepted by all four PUT /api/user routes.
/// Only the provided fields are written.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_artist: Option<bool>,
}
