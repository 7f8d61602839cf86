//! # Random suggestion
//!
//! "What to cook today": one recipe of a category, drawn uniformly from the
//! user's own recipes and the shared suggestions.

use std::sync::Arc;
use std::time::Duration;

use domains::{Category, CurrentUser, DomainResult, Recipe, RecipeStore, SuggestionStore};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(Recipe),
    /// Nothing of that category exists. Not an error.
    NoCandidates,
    NotAuthenticated,
}

/// Owned recipes of `category`, then suggestions of `category`.
pub fn candidate_pool(
    owned: Vec<Recipe>,
    suggested: Vec<Recipe>,
    category: Category,
) -> Vec<Recipe> {
    owned
        .into_iter()
        .chain(suggested)
        .filter(|r| r.is_category(category))
        .collect()
}

/// Uniform choice; `None` only for an empty pool.
pub fn choose_uniform<'a, R: Rng + ?Sized>(pool: &'a [Recipe], rng: &mut R) -> Option<&'a Recipe> {
    pool.choose(rng)
}

pub struct RandomSuggestionPicker {
    recipes: Arc<dyn RecipeStore>,
    suggestions: Arc<dyn SuggestionStore>,
    user: Arc<dyn CurrentUser>,
    selection: Option<Recipe>,
}

impl RandomSuggestionPicker {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        suggestions: Arc<dyn SuggestionStore>,
        user: Arc<dyn CurrentUser>,
    ) -> Self {
        Self {
            recipes,
            suggestions,
            user,
            selection: None,
        }
    }

    /// Picks with the thread-local generator.
    pub async fn pick(&mut self, category: Category) -> DomainResult<PickOutcome> {
        let Some(pool) = self.candidates(category).await? else {
            return Ok(PickOutcome::NotAuthenticated);
        };
        let chosen = choose_uniform(&pool, &mut rand::rng()).cloned();
        Ok(self.settle(category, pool.len(), chosen))
    }

    /// Picks with a caller-supplied generator.
    pub async fn pick_with<R: Rng + ?Sized>(
        &mut self,
        category: Category,
        rng: &mut R,
    ) -> DomainResult<PickOutcome> {
        let Some(pool) = self.candidates(category).await? else {
            return Ok(PickOutcome::NotAuthenticated);
        };
        let chosen = choose_uniform(&pool, rng).cloned();
        Ok(self.settle(category, pool.len(), chosen))
    }

    /// The last successful pick. Survives later empty results.
    pub fn selection(&self) -> Option<&Recipe> {
        self.selection.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.user_id().is_some()
    }

    async fn candidates(&self, category: Category) -> DomainResult<Option<Vec<Recipe>>> {
        let Some(user) = self.user.user_id() else {
            debug!(%category, "skipping random pick: not authenticated");
            return Ok(None);
        };
        let owned = self.recipes.list_by_user(&user).await?;
        let suggested = self.suggestions.list_all().await?;
        Ok(Some(candidate_pool(owned, suggested, category)))
    }

    fn settle(
        &mut self,
        category: Category,
        pool_size: usize,
        chosen: Option<Recipe>,
    ) -> PickOutcome {
        match chosen {
            Some(recipe) => {
                info!(%category, pool_size, recipe_id = %recipe.id, "random recipe picked");
                self.selection = Some(recipe.clone());
                PickOutcome::Picked(recipe)
            }
            None => {
                info!(%category, "no recipes to pick from");
                PickOutcome::NoCandidates
            }
        }
    }
}

/// UI-facing wrapper that waits before fetching so a loading state can be
/// shown. Signed-out calls return at once.
pub struct PacedPicker {
    picker: RandomSuggestionPicker,
    delay: Duration,
}

impl PacedPicker {
    pub fn new(picker: RandomSuggestionPicker, delay: Duration) -> Self {
        Self { picker, delay }
    }

    pub async fn pick(&mut self, category: Category) -> DomainResult<PickOutcome> {
        if !self.picker.is_authenticated() {
            return Ok(PickOutcome::NotAuthenticated);
        }
        tokio::time::sleep(self.delay).await;
        self.picker.pick(category).await
    }

    pub fn selection(&self) -> Option<&Recipe> {
        self.picker.selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use domains::{DomainError, MockRecipeStore, MockSuggestionStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn picker(owned: Vec<Recipe>, suggested: Vec<Recipe>) -> RandomSuggestionPicker {
        let mut recipes = MockRecipeStore::new();
        recipes
            .expect_list_by_user()
            .returning(move |_| Ok(owned.clone()));
        let mut suggestions = MockSuggestionStore::new();
        suggestions
            .expect_list_all()
            .returning(move || Ok(suggested.clone()));
        RandomSuggestionPicker::new(Arc::new(recipes), Arc::new(suggestions), signed_in("u1"))
    }

    fn mixed_pool() -> (Vec<Recipe>, Vec<Recipe>) {
        (
            vec![
                owned("1", "Bife", "carne"),
                owned("2", "Dourada", "peixe"),
                owned("3", "Pastel de nata", "pastelaria"),
            ],
            vec![
                suggested("s1", "Bacalhau", "peixe"),
                suggested("s2", "Cozido", "carne"),
                suggested("s3", "Sopa", "sopa"),
            ],
        )
    }

    #[test]
    fn pool_keeps_owned_first_and_only_the_category() {
        let (owned, suggested) = mixed_pool();
        let pool = candidate_pool(owned, suggested, Category::Fish);
        let ids: Vec<_> = pool.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "s1"]);
    }

    #[test]
    fn choose_from_empty_pool_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(choose_uniform(&[], &mut rng).is_none());
    }

    #[test]
    fn choice_covers_every_candidate() {
        let (owned, suggested) = mixed_pool();
        let pool = candidate_pool(owned, suggested, Category::Meat);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(choose_uniform(&pool, &mut rng).unwrap().id.clone());
        }
        assert_eq!(seen.len(), 2);
    }

    #[tokio::test]
    async fn pick_always_matches_requested_category() {
        let (owned, suggested) = mixed_pool();
        let mut p = picker(owned, suggested);
        let mut rng = StdRng::seed_from_u64(1);
        for category in Category::ALL {
            for _ in 0..20 {
                match p.pick_with(category, &mut rng).await.unwrap() {
                    PickOutcome::Picked(r) => assert!(r.is_category(category)),
                    PickOutcome::NoCandidates => assert_eq!(category, Category::Vegetarian),
                    PickOutcome::NotAuthenticated => panic!("user is signed in"),
                }
            }
        }
    }

    #[tokio::test]
    async fn empty_pool_keeps_previous_selection() {
        let (owned, suggested) = mixed_pool();
        let mut p = picker(owned, suggested);

        let first = match p.pick(Category::Pastry).await.unwrap() {
            PickOutcome::Picked(r) => r,
            other => panic!("expected a pick, got {other:?}"),
        };
        assert_eq!(first.id, "3");

        assert_eq!(p.pick(Category::Vegetarian).await.unwrap(), PickOutcome::NoCandidates);
        assert_eq!(p.selection(), Some(&first));
    }

    #[tokio::test]
    async fn signed_out_pick_does_not_touch_stores() {
        let mut p = RandomSuggestionPicker::new(
            Arc::new(MockRecipeStore::new()),
            Arc::new(MockSuggestionStore::new()),
            signed_out(),
        );
        assert_eq!(p.pick(Category::Fish).await.unwrap(), PickOutcome::NotAuthenticated);
        assert!(p.selection().is_none());
    }

    #[tokio::test]
    async fn store_failure_is_surfaced() {
        let mut recipes = MockRecipeStore::new();
        recipes
            .expect_list_by_user()
            .returning(|_| Err(DomainError::Store("offline".into())));
        let mut p = RandomSuggestionPicker::new(
            Arc::new(recipes),
            Arc::new(MockSuggestionStore::new()),
            signed_in("u1"),
        );
        assert_eq!(
            p.pick(Category::Meat).await.unwrap_err(),
            DomainError::Store("offline".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paced_pick_waits_before_fetching() {
        let (owned, suggested) = mixed_pool();
        let mut paced = PacedPicker::new(picker(owned, suggested), Duration::from_secs(2));

        let started = tokio::time::Instant::now();
        let outcome = paced.pick(Category::Pastry).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(matches!(outcome, PickOutcome::Picked(_)));
        assert_eq!(paced.selection().map(|r| r.id.as_str()), Some("3"));
    }

    #[tokio::test(start_paused = true)]
    async fn paced_pick_skips_delay_when_signed_out() {
        let p = RandomSuggestionPicker::new(
            Arc::new(MockRecipeStore::new()),
            Arc::new(MockSuggestionStore::new()),
            signed_out(),
        );
        let mut paced = PacedPicker::new(p, Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        assert_eq!(paced.pick(Category::Fish).await.unwrap(), PickOutcome::NotAuthenticated);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
