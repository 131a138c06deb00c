use super::models::{Artist, Gallery, Listing, NewArtist, Photo};
use crate::common::{
    generate_artist_id, generate_gallery_id, generate_listing_id, generate_photo_id, ApiError,
};
use sqlx::SqlitePool;
use tracing::info;

/// Owner-scoped access to the records a user account owns. The deletion
/// cascade drives the delete/find side; fixtures and future CRUD routes
/// drive the create side.
pub struct MarketplaceService {
    db: SqlitePool,
}

impl MarketplaceService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Record creation
    // ============================================================================

    pub async fn create_listing(
        &self,
        owner_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Listing, ApiError> {
        let id = generate_listing_id();

        sqlx::query("INSERT INTO listings (id, owner_id, title, description) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(owner_id)
            .bind(title)
            .bind(description)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn create_gallery(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Gallery, ApiError> {
        let id = generate_gallery_id();

        sqlx::query("INSERT INTO galleries (id, owner_id, name, description) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(owner_id)
            .bind(name)
            .bind(description)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        sqlx::query_as::<_, Gallery>("SELECT * FROM galleries WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn create_artist(
        &self,
        owner_id: &str,
        username: &str,
        email: &str,
        profile: NewArtist,
    ) -> Result<Artist, ApiError> {
        let id = generate_artist_id();

        sqlx::query(
            r#"
            INSERT INTO artists (
                id, owner_id, username, email,
                firstname, lastname, city, zip, about, phone
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(username)
        .bind(email)
        .bind(profile.firstname.as_deref())
        .bind(profile.lastname.as_deref())
        .bind(profile.city.as_deref())
        .bind(profile.zip.as_deref())
        .bind(profile.about.as_deref())
        .bind(profile.phone.as_deref())
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn create_photo(
        &self,
        owner_id: &str,
        name: Option<&str>,
        object_key: &str,
        url: Option<&str>,
    ) -> Result<Photo, ApiError> {
        let id = generate_photo_id();

        sqlx::query(
            "INSERT INTO photos (id, owner_id, name, object_key, url) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(name)
        .bind(object_key)
        .bind(url)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    // ============================================================================
    // Owner-scoped queries and deletion
    // ============================================================================

    /// Photos must be fetched before their records are deleted: the cascade
    /// needs the object keys to clear the blobs.
    pub async fn find_photos_by_owner(&self, owner_id: &str) -> Result<Vec<Photo>, ApiError> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn delete_listings_by_owner(&self, owner_id: &str) -> Result<u64, ApiError> {
        self.delete_by_owner("listings", owner_id).await
    }

    pub async fn delete_galleries_by_owner(&self, owner_id: &str) -> Result<u64, ApiError> {
        self.delete_by_owner("galleries", owner_id).await
    }

    pub async fn delete_artists_by_owner(&self, owner_id: &str) -> Result<u64, ApiError> {
        self.delete_by_owner("artists", owner_id).await
    }

    pub async fn delete_photos_by_owner(&self, owner_id: &str) -> Result<u64, ApiError> {
        self.delete_by_owner("photos", owner_id).await
    }

    async fn delete_by_owner(&self, table: &str, owner_id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE owner_id = ?", table))
            .bind(owner_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(table = %table, owner_id = %owner_id, count = deleted, "Deleted owned records");
        }

        Ok(deleted)
    }
}
