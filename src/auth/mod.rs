//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Password signup and basic-auth login
//! - Google and Facebook OAuth callbacks (identity resolution)
//! - JWT token generation and validation
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use extractors::{AuthedUser, BasicCredentials};
pub use models::User;
pub use routes::auth_routes;
