//! Tests for account module
//!
//! These tests verify the deletion cascade ordering and failure semantics
//! against an in-memory object store, plus the partial-update path.

#[cfg(test)]
mod tests {
    use super::super::models::UpdateUserRequest;
    use super::super::services::AccountService;
    use crate::auth::handlers::insert_local_user;
    use crate::auth::models::User;
    use crate::common::{generate_raw_id, migrations, ApiError};
    use crate::marketplace::{MarketplaceService, NewArtist};
    use crate::services::storage::{ObjectStore, StorageError};
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    // ============================================================================
    // Object store fakes
    // ============================================================================

    /// In-memory object store tracking live blobs by key.
    #[derive(Default)]
    struct InMemoryStore {
        objects: Mutex<HashSet<String>>,
    }

    impl InMemoryStore {
        fn with_keys(keys: &[String]) -> Arc<Self> {
            Arc::new(Self {
                objects: Mutex::new(keys.iter().cloned().collect()),
            })
        }

        fn contains(&self, key: &str) -> bool {
            self.objects.lock().unwrap().contains(key)
        }

        fn live_count(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ObjectStore for InMemoryStore {
        async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
            // Deleting an absent key succeeds, matching S3 semantics
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// Object store whose deletions always fail.
    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn delete_object(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::S3Error("injected delete failure".to_string()))
        }
    }

    // ============================================================================
    // Fixtures
    // ============================================================================

    async fn setup_test_db() -> SqlitePool {
        // Single connection: every in-memory connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    /// Fixture: a persisted password user. Low bcrypt cost, fixtures only.
    async fn mock_user(pool: &SqlitePool) -> User {
        let username = format!("user-{}", generate_raw_id(6));
        let email = format!("{}@art.fancyartist", generate_raw_id(6));
        let hash = bcrypt::hash(generate_raw_id(10), 4).unwrap();

        insert_local_user(pool, &username, &email, &hash)
            .await
            .unwrap()
    }

    /// Fixture: listings, a gallery, an artist profile, and `photo_count`
    /// photos owned by the user. Returns the photo object keys.
    async fn seed_owned_records(
        pool: &SqlitePool,
        user: &User,
        photo_count: usize,
    ) -> Vec<String> {
        let service = MarketplaceService::new(pool.clone());

        service
            .create_listing(&user.id, "oil on canvas", Some("original work"))
            .await
            .unwrap();
        service
            .create_listing(&user.id, "watercolor study", None)
            .await
            .unwrap();
        service
            .create_gallery(&user.id, "spring collection", None)
            .await
            .unwrap();
        service
            .create_artist(&user.id, &user.username, &user.email, NewArtist::default())
            .await
            .unwrap();

        let mut keys = Vec::new();
        for i in 0..photo_count {
            let key = format!("{}/{}-{}.jpg", user.id, i, generate_raw_id(8));
            service
                .create_photo(&user.id, None, &key, None)
                .await
                .unwrap();
            keys.push(key);
        }

        keys
    }

    async fn count(pool: &SqlitePool, table: &str, owner_id: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE owner_id = ?",
            table
        ))
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn user_exists(pool: &SqlitePool, user_id: &str) -> bool {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
        n == 1
    }

    // ============================================================================
    // Deletion Cascade Tests
    // ============================================================================

    #[tokio::test]
    async fn test_cascade_removes_all_records_and_blobs() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;
        let keys = seed_owned_records(&pool, &user, 3).await;

        let mut all_keys = keys.clone();
        all_keys.push("someone-else/unrelated.jpg".to_string());
        let store = InMemoryStore::with_keys(&all_keys);

        let service = AccountService::new(pool.clone(), store.clone());
        service.delete_account(&user.id).await.unwrap();

        assert!(!user_exists(&pool, &user.id).await);
        for table in ["listings", "galleries", "artists", "photos"] {
            assert_eq!(count(&pool, table, &user.id).await, 0);
        }

        // All three owned blobs removed, unrelated blob untouched
        for key in &keys {
            assert!(!store.contains(key));
        }
        assert!(store.contains("someone-else/unrelated.jpg"));
        assert_eq!(store.live_count(), 1);
    }

    #[tokio::test]
    async fn test_cascade_with_no_owned_records_succeeds() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;
        let store = Arc::new(InMemoryStore::default());

        let service = AccountService::new(pool.clone(), store);
        service.delete_account(&user.id).await.unwrap();

        assert!(!user_exists(&pool, &user.id).await);
    }

    #[tokio::test]
    async fn test_cascade_on_deleted_user_is_not_found() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;
        let store = Arc::new(InMemoryStore::default());

        let service = AccountService::new(pool.clone(), store);
        service.delete_account(&user.id).await.unwrap();

        // Re-issuing the delete is a NotFound, never a silent success
        let result = service.delete_account(&user.id).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cascade_on_unknown_user_is_not_found() {
        let pool = setup_test_db().await;
        let store = Arc::new(InMemoryStore::default());

        let service = AccountService::new(pool.clone(), store);
        let result = service.delete_account("U_MISSNG").await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cascade_blob_failure_aborts_before_photo_rows() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;
        seed_owned_records(&pool, &user, 2).await;

        let service = AccountService::new(pool.clone(), Arc::new(FailingStore));
        let result = service.delete_account(&user.id).await;

        assert!(matches!(result, Err(ApiError::StorageError(_))));

        // Earlier steps already ran and are not rolled back
        assert!(!user_exists(&pool, &user.id).await);
        assert_eq!(count(&pool, "listings", &user.id).await, 0);
        assert_eq!(count(&pool, "galleries", &user.id).await, 0);
        assert_eq!(count(&pool, "artists", &user.id).await, 0);

        // The photo rows survive the aborted step for reconciliation
        assert_eq!(count(&pool, "photos", &user.id).await, 2);
    }

    #[tokio::test]
    async fn test_cascade_leaves_other_accounts_untouched() {
        let pool = setup_test_db().await;
        let victim = mock_user(&pool).await;
        let bystander = mock_user(&pool).await;

        let victim_keys = seed_owned_records(&pool, &victim, 2).await;
        let bystander_keys = seed_owned_records(&pool, &bystander, 2).await;

        let all_keys: Vec<String> = victim_keys
            .iter()
            .chain(bystander_keys.iter())
            .cloned()
            .collect();
        let store = InMemoryStore::with_keys(&all_keys);

        let service = AccountService::new(pool.clone(), store.clone());
        service.delete_account(&victim.id).await.unwrap();

        assert!(user_exists(&pool, &bystander.id).await);
        for (table, expected) in [("listings", 2), ("galleries", 1), ("artists", 1), ("photos", 2)]
        {
            assert_eq!(count(&pool, table, &bystander.id).await, expected);
        }
        for key in &bystander_keys {
            assert!(store.contains(key));
        }
    }

    // ============================================================================
    // Partial Update Tests
    // ============================================================================

    fn update(field: &str, value: &str) -> UpdateUserRequest {
        let mut request = UpdateUserRequest::default();
        match field {
            "username" => request.username = Some(value.to_string()),
            "email" => request.email = Some(value.to_string()),
            "password" => request.password = Some(value.to_string()),
            _ => unreachable!(),
        }
        request
    }

    #[tokio::test]
    async fn test_update_email_changes_only_email() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let updated = service
            .update_user(&user.id, update("email", "new@art.fancyartist"))
            .await
            .unwrap();

        assert_eq!(updated.email, "new@art.fancyartist");
        assert_eq!(updated.username, user.username);
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let updated = service
            .update_user(&user.id, update("password", "brand-new-pass"))
            .await
            .unwrap();

        let hash = updated.password_hash.as_deref().unwrap();
        assert_ne!(Some(hash), user.password_hash.as_deref());
        assert!(bcrypt::verify("brand-new-pass", hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_rejects_short_password() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let result = service
            .update_user(&user.id, update("password", "short"))
            .await;

        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_become_artist_sets_flag() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;
        assert_eq!(user.is_artist, 0);

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let updated = service
            .update_user(
                &user.id,
                UpdateUserRequest {
                    is_artist: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.is_artist, 1);
    }

    #[tokio::test]
    async fn test_update_with_no_fields_returns_user_unchanged() {
        let pool = setup_test_db().await;
        let user = mock_user(&pool).await;

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let updated = service
            .update_user(&user.id, UpdateUserRequest::default())
            .await
            .unwrap();

        assert_eq!(updated.username, user.username);
        assert_eq!(updated.email, user.email);
    }

    #[tokio::test]
    async fn test_update_duplicate_email_conflicts() {
        let pool = setup_test_db().await;
        let user_a = mock_user(&pool).await;
        let user_b = mock_user(&pool).await;

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let result = service
            .update_user(&user_b.id, update("email", &user_a.email))
            .await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let pool = setup_test_db().await;

        let service = AccountService::new(pool.clone(), Arc::new(InMemoryStore::default()));
        let result = service
            .update_user("U_MISSNG", update("email", "x@art.fancyartist"))
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
