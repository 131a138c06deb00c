// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::oauth::OAuthConfig;
use crate::services::storage::ObjectStore;

/// Application state containing database pool, external collaborators, and
/// configuration. Constructed once in main and passed to handlers via
/// Extension, no process-global clients.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub jwt_secret: String,
    pub google_oauth: OAuthConfig,
    pub facebook_oauth: OAuthConfig,
    pub object_store: Arc<dyn ObjectStore>,
}
