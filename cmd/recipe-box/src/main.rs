//! # recipe-box
//!
//! Composition root. Wires the in-process adapters into the services and
//! walks one session end to end: register, author a recipe, browse and
//! filter the collection, ask for a suggestion, then clean up.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::LocalIdentityProvider;
use configs::Settings;
use domains::{Category, RecipeDraft, RecipeFilter, RegistrationForm, StepList};
use services::{
    AccountService, DeleteOutcome, HomeFeed, LoadOutcome, PacedPicker, PickOutcome,
    RandomSuggestionPicker, RecipeAuthoring, RecipeCollection,
};
use storage_adapters::{
    InMemoryProfileStore, InMemoryRecipeStore, InMemorySuggestionStore, LocalBlobStore,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BUILTIN_SUGGESTIONS: &str = include_str!("../../../data/suggestions.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("building log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Adapters
    let identity = Arc::new(LocalIdentityProvider::new());
    let recipes = Arc::new(InMemoryRecipeStore::new());
    let profiles = Arc::new(InMemoryProfileStore::new());
    let suggestions = Arc::new(load_suggestions(&settings).await?);
    info!(count = suggestions.len(), "suggestions ready");

    let blobs = Arc::new(LocalBlobStore::new(
        settings.media.root.clone(),
        settings.media.url_prefix.clone(),
    ));

    // 2. Services
    let accounts = AccountService::new(identity.clone(), profiles, identity.clone());
    let authoring = RecipeAuthoring::new(
        recipes.clone(),
        blobs,
        identity.clone(),
        settings.default_images.clone(),
    );
    let mut collection =
        RecipeCollection::new(recipes.clone(), suggestions.clone(), identity.clone());
    let mut picker = PacedPicker::new(
        RandomSuggestionPicker::new(recipes.clone(), suggestions.clone(), identity.clone()),
        settings.suggestion_delay(),
    );
    let home = HomeFeed::new(
        recipes,
        suggestions,
        identity,
        settings.home.recent_limit,
        settings.home.highlight_limit,
    );

    // 3. Session
    let user = accounts
        .register(RegistrationForm {
            name: "Maria".into(),
            surname: "Costa".into(),
            email: "maria@example.com".into(),
            gender: "feminino".into(),
            password: "bacalhau".into(),
            confirm_password: "bacalhau".into(),
        })
        .await
        .context("registering demo user")?;
    info!(user_id = %user, "signed in");

    let mut steps = StepList::new();
    steps.update_step(0, "Cozer o arroz com o caldo")?;
    steps.add_step();
    steps.update_step(1, "Juntar o marisco no fim")?;
    let draft = RecipeDraft {
        name: "Arroz de marisco".into(),
        category: Some(Category::Fish),
        ingredients: "arroz, amêijoa, camarão, tomate, coentros".into(),
        steps,
        image: None,
    };
    let Some(recipe_id) = authoring.create(draft).await.context("creating recipe")? else {
        anyhow::bail!("session was lost before the recipe could be created");
    };

    match collection.load().await.context("loading collection")? {
        LoadOutcome::Reloaded { owned, suggested } => info!(owned, suggested, "collection loaded"),
        LoadOutcome::NotAuthenticated => warn!("collection not loaded: signed out"),
    }

    collection.apply_filter(RecipeFilter::new("arroz", Some(Category::Fish)));
    for recipe in collection.view() {
        info!(
            id = %recipe.id,
            name = %recipe.name,
            date = %recipe.display_date().unwrap_or_default(),
            suggested = recipe.is_suggested,
            "filtered"
        );
    }
    collection.clear_filter();
    info!(visible = collection.view().len(), "filter cleared");

    let recent = home.recent().await?;
    let highlights = home.highlights().await?;
    info!(recent = recent.len(), highlights = highlights.len(), "home feed");

    match picker.pick(Category::Fish).await.context("picking suggestion")? {
        PickOutcome::Picked(recipe) => info!(id = %recipe.id, name = %recipe.name, "suggested"),
        PickOutcome::NoCandidates => info!("no fish recipes to suggest"),
        PickOutcome::NotAuthenticated => warn!("suggestion skipped: signed out"),
    }

    match collection.delete_recipe(&recipe_id).await.context("deleting recipe")? {
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyGone => info!(id = %recipe_id, "removed"),
        DeleteOutcome::NotAuthenticated => warn!("delete skipped: signed out"),
    }

    accounts.sign_out().await?;
    Ok(())
}

async fn load_suggestions(settings: &Settings) -> anyhow::Result<InMemorySuggestionStore> {
    match &settings.suggestions_seed {
        Some(path) => InMemorySuggestionStore::from_json_file(path)
            .await
            .with_context(|| format!("seeding suggestions from {}", path.display())),
        None => {
            let documents = serde_json::from_str(BUILTIN_SUGGESTIONS)
                .context("parsing built-in suggestions")?;
            Ok(InMemorySuggestionStore::from_documents(documents))
        }
    }
}
