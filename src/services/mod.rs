// Services module - external collaborators behind narrow contracts

pub mod oauth;
pub mod storage;

pub use oauth::{FacebookOAuth, GoogleOAuth, OAuthConfig, Provider, ProviderProfile};
pub use storage::{ObjectStore, S3Storage, StorageError};
