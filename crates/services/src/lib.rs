//! # services
//!
//! Use cases of recipe-box, written against the `domains` ports only.
//! Every service receives its collaborators as `Arc<dyn Port>` at
//! construction; none of them owns a store or a session.

pub mod account;
pub mod authoring;
pub mod collection;
pub mod home;
pub mod suggestion;

pub use account::AccountService;
pub use authoring::RecipeAuthoring;
pub use collection::{DeleteOutcome, LoadOutcome, RecipeCollection};
pub use home::HomeFeed;
pub use suggestion::{PacedPicker, PickOutcome, RandomSuggestionPicker};
