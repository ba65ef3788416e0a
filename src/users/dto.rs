use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Request body for user registration. Missing fields decode as empty and
/// then fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial user for `PUT /user/:userId`. Absent or null fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_valid_email(&self.email) {
            return Err("Invalid email format");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters long");
        }
        Ok(())
    }
}
