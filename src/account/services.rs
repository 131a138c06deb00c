use super::models::UpdateUserRequest;
use super::validators::UpdateUserValidator;
use crate::auth::models::User;
use crate::common::{ApiError, Validator};
use crate::marketplace::MarketplaceService;
use crate::services::storage::ObjectStore;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, info};

/// Account lifecycle operations: partial profile updates and the
/// irreversible deletion cascade.
pub struct AccountService {
    db: SqlitePool,
    store: Arc<dyn ObjectStore>,
}

impl AccountService {
    pub fn new(db: SqlitePool, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    /// Delete a user account and everything it owns.
    ///
    /// Fixed step order, each step awaiting the previous: the user row goes
    /// first (an already-deleted account yields NotFound, and a token for it
    /// stops resolving), then listings, galleries, artists; photo rows are
    /// fetched for their object keys, all blob deletions run concurrently
    /// and are joined, and only then are the photo rows deleted.
    ///
    /// There is no rollback. A failing step aborts the remaining steps and
    /// surfaces the error; deletions that already happened stay deleted, and
    /// a failed blob deletion leaves the photo rows in place.
    pub async fn delete_account(&self, user_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        let records = MarketplaceService::new(self.db.clone());

        records.delete_listings_by_owner(user_id).await?;
        records.delete_galleries_by_owner(user_id).await?;
        records.delete_artists_by_owner(user_id).await?;

        // Object keys must be read before the photo rows are deleted
        let photos = records.find_photos_by_owner(user_id).await?;

        let deletions = photos
            .iter()
            .map(|photo| self.store.delete_object(&photo.object_key));

        futures::future::try_join_all(deletions).await.map_err(|e| {
            error!(
                error = %e,
                user_id = %user_id,
                photo_count = photos.len(),
                "Blob deletion failed mid-cascade, photo records left for reconciliation"
            );
            ApiError::StorageError(e)
        })?;

        records.delete_photos_by_owner(user_id).await?;

        info!(user_id = %user_id, "Account deletion cascade completed");

        Ok(())
    }

    /// Apply a partial update to a user and return the stored row.
    /// A request with no fields set returns the user unchanged.
    pub async fn update_user(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let validation_result = UpdateUserValidator.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        // Build dynamic update query from the provided fields only
        let mut updates = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(username) = &request.username {
            updates.push("username = ?");
            params.push(username.clone());
        }

        if let Some(email) = &request.email {
            updates.push("email = ?");
            params.push(email.clone());
        }

        if let Some(password) = &request.password {
            let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
                error!(error = %e, "Password hashing failed");
                ApiError::InternalServer("password hashing failed".to_string())
            })?;
            updates.push("password_hash = ?");
            params.push(password_hash);
        }

        if let Some(is_artist) = request.is_artist {
            updates.push("is_artist = ?");
            params.push(if is_artist { "1" } else { "0" }.to_string());
        }

        if updates.is_empty() {
            return self.get_user_by_id(user_id).await;
        }

        updates.push("updated_at = ?");
        params.push(chrono::Utc::now().to_rfc3339());
        params.push(user_id.to_string());

        let query = format!("UPDATE users SET {} WHERE id = ?", updates.join(", "));

        let mut query_builder = sqlx::query(&query);
        for param in params {
            query_builder = query_builder.bind(param);
        }

        let result = query_builder.execute(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::Conflict("username or email already in use".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        info!(user_id = %user_id, "User profile updated");

        self.get_user_by_id(user_id).await
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
    }
}
