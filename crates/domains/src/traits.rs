//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be composed by the binary.
//! Services receive them as `Arc<dyn Trait>`; nothing here holds global state.

use async_trait::async_trait;
use bytes::Bytes;

use crate::account::UserProfile;
use crate::error::DomainResult;
use crate::models::{NewRecipe, Recipe, RecipePatch, UserId};

/// Persistence contract for user-owned recipes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Every recipe owned by `user`, in store order.
    async fn list_by_user(&self, user: &UserId) -> DomainResult<Vec<Recipe>>;

    /// Writes a new recipe and returns the store-assigned id.
    async fn create(&self, recipe: NewRecipe) -> DomainResult<String>;

    /// Replaces one field of a recipe owned by `owner`.
    async fn update(&self, owner: &UserId, id: &str, patch: RecipePatch) -> DomainResult<()>;

    /// Removes a recipe owned by `owner`. Unknown ids are `NotFound`.
    async fn delete(&self, owner: &UserId, id: &str) -> DomainResult<()>;
}

/// Read-only source of shared suggestion recipes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// All suggestions, each with `is_suggested` set.
    async fn list_all(&self) -> DomainResult<Vec<Recipe>>;
}

/// Who is signed in right now. `None` means unauthenticated.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CurrentUser: Send + Sync {
    fn user_id(&self) -> Option<UserId>;
}

/// Media storage contract for recipe pictures.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Saves raw bytes and returns the public URI of the stored object.
    async fn upload(&self, data: Bytes, content_type: &mime::Mime) -> DomainResult<String>;
}

/// Credential contract. Implementations track the active session.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> DomainResult<UserId>;

    async fn sign_in(&self, email: &str, password: &str) -> DomainResult<UserId>;

    async fn sign_out(&self) -> DomainResult<()>;
}

/// Profile documents keyed by user.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user: &UserId) -> DomainResult<Option<UserProfile>>;

    async fn put(&self, user: &UserId, profile: UserProfile) -> DomainResult<()>;
}
