use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        let password_len = self.password.chars().count();
        if password_len < 8 || password_len > 128 {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }
        Ok(Self {
            username,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 1..64 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// Profile fields a user may edit about themselves. Username is fixed at
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProfileUpdateRequest {
    pub(crate) email: String,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
}

impl ProfileUpdateRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = normalize_email(&self.email)?;
        Ok(Self {
            email,
            first_name: normalize_name("first_name", self.first_name)?,
            last_name: normalize_name("last_name", self.last_name)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

fn normalize_name(
    field: &'static str,
    name: Option<String>,
) -> Result<Option<String>, DomainError> {
    match name {
        None => Ok(None),
        Some(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Ok(None);
            }
            if name.len() > 150 {
                return Err(DomainError::Validation {
                    field,
                    message: "must be at most 150 chars",
                });
            }
            Ok(Some(name.to_string()))
        }
    }
}
