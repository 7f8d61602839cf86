//! Home screen feed: newest own recipes and newest shared suggestions.

use std::sync::Arc;

use domains::{CurrentUser, DomainResult, Recipe, RecipeStore, SuggestionStore};

/// Sorts by creation date, newest first, and keeps the first `limit`.
/// Recipes with equal dates keep their relative order.
pub fn newest_first(mut recipes: Vec<Recipe>, limit: usize) -> Vec<Recipe> {
    recipes.sort_by(|a, b| b.date.cmp(&a.date));
    recipes.truncate(limit);
    recipes
}

pub struct HomeFeed {
    recipes: Arc<dyn RecipeStore>,
    suggestions: Arc<dyn SuggestionStore>,
    user: Arc<dyn CurrentUser>,
    recent_limit: usize,
    highlight_limit: usize,
}

impl HomeFeed {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        suggestions: Arc<dyn SuggestionStore>,
        user: Arc<dyn CurrentUser>,
        recent_limit: usize,
        highlight_limit: usize,
    ) -> Self {
        Self {
            recipes,
            suggestions,
            user,
            recent_limit,
            highlight_limit,
        }
    }

    /// The user's latest recipes. Empty when signed out.
    pub async fn recent(&self) -> DomainResult<Vec<Recipe>> {
        let Some(user) = self.user.user_id() else {
            return Ok(Vec::new());
        };
        let owned = self.recipes.list_by_user(&user).await?;
        Ok(newest_first(owned, self.recent_limit))
    }

    /// The latest shared suggestions. Empty when signed out.
    pub async fn highlights(&self) -> DomainResult<Vec<Recipe>> {
        if self.user.user_id().is_none() {
            return Ok(Vec::new());
        }
        let suggested = self.suggestions.list_all().await?;
        Ok(newest_first(suggested, self.highlight_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use domains::{MockRecipeStore, MockSuggestionStore};

    fn dated(id: &str, date: i64) -> Recipe {
        let mut r = owned(id, id, "carne");
        r.date = date;
        r
    }

    #[test]
    fn newest_first_is_stable_and_truncates() {
        let sorted = newest_first(
            vec![dated("a", 1), dated("b", 5), dated("c", 5), dated("d", 3)],
            3,
        );
        let ids: Vec<_> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn recent_uses_owned_recipes() {
        let mut recipes = MockRecipeStore::new();
        recipes
            .expect_list_by_user()
            .returning(|_| Ok((0..8).map(|i| dated(&i.to_string(), i)).collect()));
        let feed = HomeFeed::new(
            Arc::new(recipes),
            Arc::new(MockSuggestionStore::new()),
            signed_in("u1"),
            5,
            11,
        );
        let recent = feed.recent().await.unwrap();
        let ids: Vec<_> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn highlights_are_empty_when_signed_out() {
        let feed = HomeFeed::new(
            Arc::new(MockRecipeStore::new()),
            Arc::new(MockSuggestionStore::new()),
            signed_out(),
            5,
            11,
        );
        assert!(tokio_test::block_on(feed.highlights()).unwrap().is_empty());
        assert!(tokio_test::block_on(feed.recent()).unwrap().is_empty());
    }
}
