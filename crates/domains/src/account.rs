//! Account forms and profile data.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// `local@domain.tld`: no whitespace, a single `@`, and a dot inside the domain.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Extra user information stored next to the identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub gender: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub gender: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Checks are ordered: required fields, email shape, password length,
    /// confirmation. The first failure wins.
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            &self.name,
            &self.surname,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.gender,
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err(DomainError::Validation("all fields are required".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::Validation("invalid email address".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.password != self.confirm_password {
            return Err(DomainError::Validation("passwords do not match".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> DomainResult<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(DomainError::Validation("all fields are required".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::Validation("invalid email address".into()));
        }
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
