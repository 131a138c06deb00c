//! # Marketplace Module
//!
//! Records owned by a user account: listings, galleries, artist profiles,
//! and photos. The account-deletion cascade removes all of them; photos
//! additionally reference blobs in the object store through their object key.

pub mod models;
pub mod services;


pub use models::{Artist, Gallery, Listing, NewArtist, Photo};
pub use services::MarketplaceService;
