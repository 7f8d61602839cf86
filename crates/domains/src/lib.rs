//! recipe-box/crates/domains/src/lib.rs
//!
//! The central domain types and interface definitions for recipe-box.

pub mod account;
pub mod error;
pub mod filter;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use account::*;
pub use error::*;
pub use filter::*;
pub use models::*;
pub use traits::*;
