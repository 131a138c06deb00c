// src/account/validators.rs

use super::models::UpdateUserRequest;
use crate::auth::validators::MIN_PASSWORD_LEN;
use crate::common::{ValidationResult, Validator};

pub struct UpdateUserValidator;

impl Validator<UpdateUserRequest> for UpdateUserValidator {
    fn validate(&self, data: &UpdateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // An empty update is not an error: the route answers with the
        // unchanged user.

        if let Some(username) = &data.username {
            if username.trim().is_empty() {
                result.add_error("username", "username cannot be empty");
            } else if username.len() > 255 {
                result.add_error("username", "username must be less than 255 characters");
            }
        }

        if let Some(email) = &data.email {
            if email.trim().is_empty() {
                result.add_error("email", "email cannot be empty");
            } else if !email.contains('@') {
                result.add_error("email", "email must be a valid address");
            }
        }

        if let Some(password) = &data.password {
            if password.len() < MIN_PASSWORD_LEN {
                result.add_error("password", "password must be at least 7 characters");
            }
        }

        result
    }
}
