//! # storage-adapters
//!
//! In-process implementations of the recipe-box storage ports: document-backed
//! recipe and suggestion stores, a profile store, and local media storage.

pub mod documents;
#[cfg(feature = "media-local")]
pub mod media_local;
pub mod memory;
pub mod profiles;

#[cfg(feature = "media-local")]
pub use media_local::LocalBlobStore;
pub use memory::{InMemoryRecipeStore, InMemorySuggestionStore};
pub use profiles::InMemoryProfileStore;
