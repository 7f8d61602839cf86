//! # Recipe collection
//!
//! The working set behind the recipe list screen: the signed-in user's
//! recipes followed by every shared suggestion, and the filtered view of it.

use std::sync::Arc;

use domains::{
    Category, CurrentUser, DomainResult, Recipe, RecipeFilter, RecipeStore, SortOrder,
    SuggestionStore,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Reloaded { owned: usize, suggested: usize },
    /// No one is signed in; the working set was left as it was.
    NotAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The store no longer had it; the local copy was dropped anyway.
    AlreadyGone,
    NotAuthenticated,
}

pub struct RecipeCollection {
    recipes: Arc<dyn RecipeStore>,
    suggestions: Arc<dyn SuggestionStore>,
    user: Arc<dyn CurrentUser>,
    /// Owned recipes followed by suggestions, in store order
    working_set: Vec<Recipe>,
    /// Indexes into `working_set` that pass `filter`, ascending
    view: Vec<usize>,
    filter: RecipeFilter,
    sort_order: Option<SortOrder>,
}

impl RecipeCollection {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        suggestions: Arc<dyn SuggestionStore>,
        user: Arc<dyn CurrentUser>,
    ) -> Self {
        Self {
            recipes,
            suggestions,
            user,
            working_set: Vec::new(),
            view: Vec::new(),
            filter: RecipeFilter::default(),
            sort_order: None,
        }
    }

    /// Replaces the working set with a fresh fetch and re-applies the active
    /// filter. Nothing changes if either fetch fails.
    pub async fn load(&mut self) -> DomainResult<LoadOutcome> {
        let Some(user) = self.user.user_id() else {
            debug!("skipping recipe reload: not authenticated");
            return Ok(LoadOutcome::NotAuthenticated);
        };

        let owned = self.recipes.list_by_user(&user).await?;
        let suggested = self.suggestions.list_all().await?;
        let outcome = LoadOutcome::Reloaded {
            owned: owned.len(),
            suggested: suggested.len(),
        };

        let mut working_set = owned;
        working_set.extend(suggested);
        self.working_set = working_set;
        self.refresh_view();

        info!(
            user_id = %user,
            total = self.working_set.len(),
            visible = self.view.len(),
            "recipe collection reloaded"
        );
        Ok(outcome)
    }

    pub fn apply_filter(&mut self, filter: RecipeFilter) {
        self.filter = filter;
        self.refresh_view();
        debug!(
            search = %self.filter.search_term,
            category = ?self.filter.category,
            visible = self.view.len(),
            "filter applied"
        );
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let filter = RecipeFilter {
            search_term: term.into(),
            ..self.filter.clone()
        };
        self.apply_filter(filter);
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        let filter = RecipeFilter {
            category,
            ..self.filter.clone()
        };
        self.apply_filter(filter);
    }

    /// Records the chosen ordering. The view keeps working-set order.
    // TODO: apply `sort_order` to the view once recent/oldest semantics are agreed with product.
    pub fn set_sort_order(&mut self, order: Option<SortOrder>) {
        self.sort_order = order;
    }

    /// Drops search, category and sort selections. The view becomes the
    /// whole working set again, in order.
    pub fn clear_filter(&mut self) {
        self.sort_order = None;
        self.apply_filter(RecipeFilter::default());
    }

    /// Whether any filter or sort selection is active, i.e. whether a
    /// "clear filter" affordance makes sense.
    pub fn has_active_filter(&self) -> bool {
        !self.filter.is_empty() || self.sort_order.is_some()
    }

    /// Deletes one of the user's own recipes, store first. Local state only
    /// changes once the store confirms, or reports the recipe already gone.
    pub async fn delete_recipe(&mut self, id: &str) -> DomainResult<DeleteOutcome> {
        let Some(user) = self.user.user_id() else {
            debug!(recipe_id = %id, "skipping delete: not authenticated");
            return Ok(DeleteOutcome::NotAuthenticated);
        };

        let outcome = match self.recipes.delete(&user, id).await {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) if e.is_not_found() && self.holds_owned(id) => {
                debug!(recipe_id = %id, "recipe already gone from store");
                DeleteOutcome::AlreadyGone
            }
            Err(e) => return Err(e),
        };

        self.working_set.retain(|r| r.is_suggested || r.id != id);
        self.refresh_view();
        info!(recipe_id = %id, user_id = %user, ?outcome, "recipe deleted");
        Ok(outcome)
    }

    pub fn working_set(&self) -> &[Recipe] {
        &self.working_set
    }

    pub fn view(&self) -> Vec<&Recipe> {
        self.view.iter().map(|&i| &self.working_set[i]).collect()
    }

    pub fn filter(&self) -> &RecipeFilter {
        &self.filter
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }

    fn holds_owned(&self, id: &str) -> bool {
        self.working_set
            .iter()
            .any(|r| !r.is_suggested && r.id == id)
    }

    fn refresh_view(&mut self) {
        self.view = self
            .working_set
            .iter()
            .enumerate()
            .filter(|(_, recipe)| self.filter.matches(recipe))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use domains::{DomainError, MockRecipeStore, MockSuggestionStore};

    /// Builds a loaded collection for user `u1`. `with_delete` sets up any
    /// `delete` expectations on the recipe store.
    async fn loaded(
        owned: Vec<Recipe>,
        suggested: Vec<Recipe>,
        with_delete: impl FnOnce(&mut MockRecipeStore),
    ) -> RecipeCollection {
        let mut recipes = MockRecipeStore::new();
        recipes
            .expect_list_by_user()
            .returning(move |_| Ok(owned.clone()));
        with_delete(&mut recipes);

        let mut suggestions = MockSuggestionStore::new();
        suggestions
            .expect_list_all()
            .returning(move || Ok(suggested.clone()));

        let mut c =
            RecipeCollection::new(Arc::new(recipes), Arc::new(suggestions), signed_in("u1"));
        c.load().await.unwrap();
        c
    }

    fn ids(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn load_concatenates_owned_then_suggested() {
        let c = loaded(
            vec![owned("1", "Bife", "carne")],
            vec![suggested("s1", "Polvo", "peixe"), suggested("1", "Bife", "carne")],
            |_| {},
        )
        .await;

        let listed: Vec<_> = c
            .working_set()
            .iter()
            .map(|r| (r.id.as_str(), r.is_suggested))
            .collect();
        assert_eq!(listed, vec![("1", false), ("s1", true), ("1", true)]);
        assert_eq!(c.view().len(), 3);
    }

    #[tokio::test]
    async fn reload_replaces_instead_of_accumulating() {
        let mut c = loaded(
            vec![owned("1", "Bife", "carne")],
            vec![suggested("s1", "Polvo", "peixe")],
            |_| {},
        )
        .await;
        assert_eq!(
            c.load().await.unwrap(),
            LoadOutcome::Reloaded { owned: 1, suggested: 1 }
        );
        assert_eq!(c.working_set().len(), 2);
        assert_eq!(c.view().len(), 2);
    }

    #[tokio::test]
    async fn load_without_user_is_a_no_op() {
        let mut c = RecipeCollection::new(
            Arc::new(MockRecipeStore::new()),
            Arc::new(MockSuggestionStore::new()),
            signed_out(),
        );
        assert_eq!(c.load().await.unwrap(), LoadOutcome::NotAuthenticated);
        assert!(c.working_set().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_working_set() {
        let mut c = loaded(vec![owned("1", "Bife", "carne")], Vec::new(), |_| {}).await;

        let mut failing = MockSuggestionStore::new();
        failing
            .expect_list_all()
            .returning(|| Err(DomainError::Store("offline".into())));
        c.suggestions = Arc::new(failing);

        let err = c.load().await.unwrap_err();
        assert_eq!(err, DomainError::Store("offline".into()));
        assert_eq!(ids(&c.working_set().iter().collect::<Vec<_>>()), vec!["1"]);
    }

    #[tokio::test]
    async fn filter_then_clear_restores_working_set() {
        let mut c = loaded(
            vec![owned("1", "Bife", "carne")],
            vec![suggested("2", "Salmão", "peixe")],
            |_| {},
        )
        .await;
        let before: Vec<Recipe> = c.working_set().to_vec();

        c.apply_filter(RecipeFilter::category(Category::Fish));
        assert_eq!(ids(&c.view()), vec!["2"]);
        assert!(c.has_active_filter());

        c.clear_filter();
        assert!(!c.has_active_filter());
        let after: Vec<Recipe> = c.view().into_iter().cloned().collect();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn search_and_category_combine() {
        let mut c = loaded(
            vec![
                owned("1", "Kebab", "carne"),
                owned("2", "Abacate recheado", "vegetariano"),
                owned("3", "Bife", "carne"),
            ],
            vec![suggested("4", "Tabuleiro de carne", "carne")],
            |_| {},
        )
        .await;

        c.set_search_term("AB");
        assert_eq!(ids(&c.view()), vec!["1", "2", "4"]);
        c.set_category(Some(Category::Meat));
        assert_eq!(ids(&c.view()), vec!["1", "4"]);
        c.set_search_term("");
        assert_eq!(ids(&c.view()), vec!["1", "3", "4"]);
    }

    #[tokio::test]
    async fn sort_order_is_recorded_but_not_applied() {
        let mut a = owned("1", "Antigo", "carne");
        a.date = 1;
        let mut b = owned("2", "Novo", "carne");
        b.date = 99;
        let mut c = loaded(vec![a, b], Vec::new(), |_| {}).await;

        c.set_sort_order(Some(SortOrder::Recent));
        assert!(c.has_active_filter());
        assert_eq!(ids(&c.view()), vec!["1", "2"]);

        c.clear_filter();
        assert_eq!(c.sort_order(), None);
    }

    #[tokio::test]
    async fn reload_keeps_active_filter() {
        let mut c = loaded(
            vec![owned("1", "Bife", "carne")],
            vec![suggested("2", "Salmão", "peixe")],
            |_| {},
        )
        .await;
        c.set_category(Some(Category::Fish));
        c.load().await.unwrap();
        assert_eq!(ids(&c.view()), vec!["2"]);
    }

    #[tokio::test]
    async fn delete_removes_entry_from_working_set_and_view() {
        let mut c = loaded(
            vec![owned("1", "Bife", "carne"), owned("2", "Bitoque", "carne")],
            vec![suggested("1", "Bife sugerido", "carne")],
            |store| {
                store
                    .expect_delete()
                    .withf(|owner, id| owner.as_str() == "u1" && id == "1")
                    .times(1)
                    .returning(|_, _| Ok(()));
            },
        )
        .await;
        c.set_search_term("bi");

        assert_eq!(c.delete_recipe("1").await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(c.working_set().len(), 2);
        assert_eq!(ids(&c.view()), vec!["2", "1"]);
        assert!(c.view()[1].is_suggested);
    }

    #[tokio::test]
    async fn failed_delete_leaves_state_untouched() {
        let mut c = loaded(
            vec![owned("1", "Bife", "carne")],
            vec![suggested("2", "Salmão", "peixe")],
            |store| {
                store
                    .expect_delete()
                    .returning(|_, _| Err(DomainError::Store("timeout".into())));
            },
        )
        .await;
        let before = c.working_set().to_vec();

        let err = c.delete_recipe("1").await.unwrap_err();
        assert_eq!(err, DomainError::Store("timeout".into()));
        assert_eq!(c.working_set(), before.as_slice());
        assert_eq!(c.view().len(), 2);
    }

    #[tokio::test]
    async fn delete_of_recipe_gone_from_store_still_drops_local_copy() {
        let mut c = loaded(vec![owned("1", "Bife", "carne")], Vec::new(), |store| {
            store
                .expect_delete()
                .returning(|_, id| Err(DomainError::not_found("Recipe", id)));
        })
        .await;

        assert_eq!(c.delete_recipe("1").await.unwrap(), DeleteOutcome::AlreadyGone);
        assert!(c.working_set().is_empty());
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_surfaced() {
        let mut c = loaded(
            vec![owned("1", "Bife", "carne")],
            vec![suggested("s1", "Polvo", "peixe")],
            |store| {
                store
                    .expect_delete()
                    .returning(|_, id| Err(DomainError::not_found("Recipe", id)));
            },
        )
        .await;

        assert!(c.delete_recipe("nope").await.unwrap_err().is_not_found());
        // suggestions are not delete targets
        assert!(c.delete_recipe("s1").await.unwrap_err().is_not_found());
        assert_eq!(c.working_set().len(), 2);
    }
}
