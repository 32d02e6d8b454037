use serde::{Deserialize, Serialize};

use super::repo_types::User;
use crate::{error::ApiError, response::PageInfo, validation::Validator};

// Request bodies default missing fields to empty strings so that an absent
// field is reported as a validation error rather than a JSON rejection.

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .length(&self.name, 2, 100, "name", "Name must be between 2 and 100 characters")
            .email(&self.email, "email")
            .length(&self.phone, 6, 20, "phone", "Phone must be between 6 and 20 characters")
            .check(
                self.password.chars().count() >= 8,
                "password",
                "Password must be at least 8 characters",
            )
            .finish()
    }
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .email(&self.email, "email")
            .required(&self.password, "password", "Password is required")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .length(&self.name, 2, 100, "name", "Name must be between 2 and 100 characters")
            .length(&self.phone, 6, 20, "phone", "Phone must be between 6 and 20 characters")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .required(&self.current_password, "currentPassword", "Current password is required")
            .check(
                self.new_password.chars().count() >= 8,
                "newPassword",
                "New password must be at least 8 characters",
            )
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgetPasswordRequest {
    pub email: String,
}

impl ForgetPasswordRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new().email(&self.email, "email").finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .required(&self.token, "token", "Reset token is required")
            .check(
                self.new_password.chars().count() >= 8,
                "newPassword",
                "New password must be at least 8 characters",
            )
            .finish()
    }
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub pagination: PageInfo,
}
