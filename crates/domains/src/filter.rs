//! # List Filtering
//!
//! Search and category predicates applied to a loaded recipe list.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Recipe};

/// Declared list ordering. Stored with the filter state but not applied to
/// the filtered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Recent,
    Oldest,
}

/// Active filter state of a recipe list. Both predicates are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring matched against the name. Empty means no filter.
    pub search_term: String,
    pub category: Option<Category>,
}

impl RecipeFilter {
    pub fn new(search_term: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self::new(term, None)
    }

    pub fn category(category: Category) -> Self {
        Self::new(String::new(), Some(category))
    }

    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.category.is_none()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_search(recipe) && self.matches_category(recipe)
    }

    fn matches_search(&self, recipe: &Recipe) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        recipe
            .name
            .to_lowercase()
            .contains(&self.search_term.to_lowercase())
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        self.category.map_or(true, |c| recipe.is_category(c))
    }
}
