//! # Account Module
//!
//! Authenticated user account management: profile updates and the
//! account-deletion cascade across owned records and stored blobs.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::account_routes;
pub use services::AccountService;
