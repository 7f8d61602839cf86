//! Shared fixtures for the integration tests: real in-memory adapters wired
//! into the services the same way the binary does it.

use std::io::Cursor;
use std::sync::Arc;

use auth_adapters::LocalIdentityProvider;
use bytes::Bytes;
use domains::{BlobStore, Category, DefaultImages, RecipeDraft, RegistrationForm, StepList, UserId};
use serde_json::{json, Value};
use services::{AccountService, HomeFeed, RandomSuggestionPicker, RecipeAuthoring, RecipeCollection};
use storage_adapters::{InMemoryProfileStore, InMemoryRecipeStore, InMemorySuggestionStore};

pub struct Harness {
    pub identity: Arc<LocalIdentityProvider>,
    pub recipes: Arc<InMemoryRecipeStore>,
    pub suggestions: Arc<InMemorySuggestionStore>,
    pub profiles: Arc<InMemoryProfileStore>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::with_suggestions(suggestion_documents())
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suggestions(documents: Vec<Value>) -> Self {
        Self {
            identity: Arc::new(LocalIdentityProvider::new()),
            recipes: Arc::new(InMemoryRecipeStore::new()),
            suggestions: Arc::new(InMemorySuggestionStore::from_documents(documents)),
            profiles: Arc::new(InMemoryProfileStore::new()),
        }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            self.identity.clone(),
            self.profiles.clone(),
            self.identity.clone(),
        )
    }

    pub fn collection(&self) -> RecipeCollection {
        RecipeCollection::new(
            self.recipes.clone(),
            self.suggestions.clone(),
            self.identity.clone(),
        )
    }

    pub fn picker(&self) -> RandomSuggestionPicker {
        RandomSuggestionPicker::new(
            self.recipes.clone(),
            self.suggestions.clone(),
            self.identity.clone(),
        )
    }

    pub fn home(&self) -> HomeFeed {
        HomeFeed::new(
            self.recipes.clone(),
            self.suggestions.clone(),
            self.identity.clone(),
            5,
            11,
        )
    }

    pub fn authoring(&self, blobs: Arc<dyn BlobStore>) -> RecipeAuthoring {
        RecipeAuthoring::new(
            self.recipes.clone(),
            blobs,
            self.identity.clone(),
            DefaultImages::default(),
        )
    }

    /// Registers `email` and leaves it signed in.
    pub async fn register(&self, email: &str) -> UserId {
        self.accounts()
            .register(registration(email))
            .await
            .expect("registration succeeds")
    }
}

pub fn registration(email: &str) -> RegistrationForm {
    RegistrationForm {
        name: "Ana".into(),
        surname: "Silva".into(),
        email: email.into(),
        gender: "feminino".into(),
        password: "segredo".into(),
        confirm_password: "segredo".into(),
    }
}

pub fn draft(name: &str, category: Category) -> RecipeDraft {
    let mut steps = StepList::new();
    steps.update_step(0, "Preparar").expect("first step exists");
    RecipeDraft {
        name: name.into(),
        category: Some(category),
        ingredients: "sal, azeite".into(),
        steps,
        image: None,
    }
}

/// Shared suggestions: two fish, one meat, one vegetarian, no pastry.
pub fn suggestion_documents() -> Vec<Value> {
    vec![
        json!({ "id": "s-bacalhau", "name": "Bacalhau com natas", "type": "peixe",
                "ingredients": "bacalhau, natas", "steps": ["Cozer", "Gratinar"], "date": 300 }),
        json!({ "id": "s-polvo", "name": "Polvo à lagareiro", "type": "peixe",
                "ingredients": "polvo, batata", "steps": ["Cozer", "Assar"], "date": 100 }),
        json!({ "id": "s-cozido", "name": "Cozido à portuguesa", "type": "carne",
                "ingredients": "carnes, enchidos", "steps": ["Cozer"], "date": 200 }),
        json!({ "id": "s-caldo", "name": "Caldo verde", "type": "vegetariano",
                "ingredients": "couve, batata", "steps": ["Cozer", "Triturar"], "date": 400 }),
    ]
}

/// A tiny valid PNG.
pub fn png_bytes() -> Bytes {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(3, 3));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encoding to memory succeeds");
    Bytes::from(buf.into_inner())
}
