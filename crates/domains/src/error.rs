//! # DomainError
//!
//! Centralized error handling for the recipe-box ecosystem.
//! Port implementations map their failures onto these variants; services
//! propagate them unchanged.

use thiserror::Error;

/// The primary error type for all domain and port operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found (e.g., Recipe, Profile)
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before reaching a store (e.g., bad email, step index)
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller is not allowed to touch the resource (e.g., someone else's recipe)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., email already registered)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store unavailable or request failed
    #[error("store error: {0}")]
    Store(String),

    /// A stored document did not match the expected record shape
    #[error("document {id} could not be decoded: {reason}")]
    Decode { id: String, reason: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A specialized Result type for recipe-box logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
