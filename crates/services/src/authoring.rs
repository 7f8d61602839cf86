//! # Recipe authoring
//!
//! Creation from a draft and whole-field edits of existing recipes.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    BlobStore, CurrentUser, DefaultImages, DomainError, DomainResult, NewRecipe, RecipeDraft,
    RecipePatch, RecipeStore, StepList,
};
use tracing::{debug, info};

pub struct RecipeAuthoring {
    recipes: Arc<dyn RecipeStore>,
    blobs: Arc<dyn BlobStore>,
    user: Arc<dyn CurrentUser>,
    default_images: DefaultImages,
}

impl RecipeAuthoring {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        blobs: Arc<dyn BlobStore>,
        user: Arc<dyn CurrentUser>,
        default_images: DefaultImages,
    ) -> Self {
        Self {
            recipes,
            blobs,
            user,
            default_images,
        }
    }

    /// Creates a recipe owned by the current user and returns its id.
    /// `None` when no one is signed in.
    ///
    /// A picked image is uploaded first; without one the category's default
    /// image is used.
    pub async fn create(&self, draft: RecipeDraft) -> DomainResult<Option<String>> {
        let Some(user) = self.user.user_id() else {
            debug!("skipping recipe creation: not authenticated");
            return Ok(None);
        };
        let category = draft
            .category
            .ok_or_else(|| DomainError::Validation("a recipe category must be selected".into()))?;

        let image = match draft.image {
            Some(upload) => self.blobs.upload(upload.data, &upload.content_type).await?,
            None => self.default_images.for_category(category).to_string(),
        };

        let recipe = NewRecipe {
            name: draft.name,
            category,
            image,
            ingredients: draft.ingredients,
            steps: draft.steps.into_inner(),
            date: Utc::now().timestamp_millis(),
            user_id: user.clone(),
        };
        let id = self.recipes.create(recipe).await?;
        info!(recipe_id = %id, user_id = %user, %category, "recipe created");
        Ok(Some(id))
    }

    pub async fn update_ingredients(&self, id: &str, ingredients: String) -> DomainResult<()> {
        self.update(id, RecipePatch::Ingredients(ingredients)).await
    }

    /// Resubmits the whole step list.
    pub async fn update_steps(&self, id: &str, steps: StepList) -> DomainResult<()> {
        self.update(id, RecipePatch::Steps(steps.into_inner())).await
    }

    async fn update(&self, id: &str, patch: RecipePatch) -> DomainResult<()> {
        let Some(user) = self.user.user_id() else {
            debug!(recipe_id = %id, "skipping recipe update: not authenticated");
            return Ok(());
        };
        let field = patch.field_name();
        self.recipes.update(&user, id, patch).await?;
        info!(recipe_id = %id, field, "recipe updated");
        Ok(())
    }
}
