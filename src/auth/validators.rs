// src/auth/validators.rs

use super::models::SignupRequest;
use crate::common::{ValidationResult, Validator};

/// Minimum password length accepted at signup and on password updates.
pub const MIN_PASSWORD_LEN: usize = 7;

pub struct SignupValidator;

impl Validator<SignupRequest> for SignupValidator {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.username.trim().is_empty() {
            result.add_error("username", "username is required");
        } else if data.username.len() > 255 {
            result.add_error("username", "username must be less than 255 characters");
        }

        if data.email.trim().is_empty() {
            result.add_error("email", "email is required");
        } else if !data.email.contains('@') {
            result.add_error("email", "email must be a valid address");
        }

        match &data.password {
            None => result.add_error("password", "requires password"),
            Some(password) => {
                if password.is_empty() {
                    result.add_error("password", "requires password");
                } else if password.len() < MIN_PASSWORD_LEN {
                    result.add_error("password", "password must be at least 7 characters");
                }
            }
        }

        result
    }
}
