//! Marketplace data models

use serde::Serialize;
use sqlx::FromRow;

/// A sale listing owned by a user
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

/// A photo gallery owned by a user
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Gallery {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

/// Public artist profile owned by a user
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Artist {
    pub id: String,
    pub owner_id: String,
    pub username: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

/// An uploaded photo. `object_key` addresses the blob in the object store;
/// the blob must outlive the record.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Photo {
    pub id: String,
    pub owner_id: String,
    pub name: Option<String>,
    pub object_key: String,
    pub url: Option<String>,
    pub created_at: Option<String>,
}

/// Fields for creating an artist profile
#[derive(Debug, Clone, Default)]
pub struct NewArtist {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
}
