//! # Domain Models
//!
//! These structs represent the core entities of recipe-box.
//! Identifiers are opaque strings assigned by the backing store.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identity of an authenticated user as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The closed set of food categories the app writes.
///
/// Stored values are the Portuguese tags (`peixe`, `carne`, `vegetariano`,
/// `pastelaria`), which is what every persisted record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "peixe")]
    Fish,
    #[serde(rename = "carne")]
    Meat,
    #[serde(rename = "vegetariano")]
    Vegetarian,
    #[serde(rename = "pastelaria")]
    Pastry,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Fish,
        Category::Meat,
        Category::Vegetarian,
        Category::Pastry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fish => "peixe",
            Category::Meat => "carne",
            Category::Vegetarian => "vegetariano",
            Category::Pastry => "pastelaria",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown recipe category '{s}'")))
    }
}

/// A single dish, either owned by a user or shared as a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    /// Category tag. Kept as a plain string: records are not validated on read.
    #[serde(rename = "type")]
    pub kind: String,
    pub image: String,
    /// One free-text block, not a structured list
    pub ingredients: String,
    pub steps: Vec<String>,
    /// Creation time in milliseconds since the Unix epoch
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Set only on records loaded from the suggestions source. Never persisted.
    #[serde(skip)]
    pub is_suggested: bool,
}

impl Recipe {
    /// The closed-set category, if the stored tag is one of the four known values.
    pub fn category(&self) -> Option<Category> {
        self.kind.parse().ok()
    }

    pub fn is_category(&self, category: Category) -> bool {
        self.kind == category.as_str()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.date).single()
    }

    /// Creation date rendered as `dd/mm/yy`.
    pub fn display_date(&self) -> Option<String> {
        self.created_at()
            .map(|at| at.format("%d/%m/%y").to_string())
    }
}

/// A recipe ready to be written by a `RecipeStore`. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub image: String,
    pub ingredients: String,
    pub steps: Vec<String>,
    pub date: i64,
    pub user_id: UserId,
}

/// Partial update accepted by `RecipeStore::update`. Both variants replace
/// the whole field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipePatch {
    Ingredients(String),
    Steps(Vec<String>),
}

impl RecipePatch {
    pub fn field_name(&self) -> &'static str {
        match self {
            RecipePatch::Ingredients(_) => "ingredients",
            RecipePatch::Steps(_) => "steps",
        }
    }
}

/// Ordered preparation steps being edited. Always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepList(Vec<String>);

impl Default for StepList {
    fn default() -> Self {
        Self(vec![String::new()])
    }
}

impl StepList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing steps, e.g. from a loaded recipe. An empty input
    /// becomes a single blank step.
    pub fn from_steps(steps: Vec<String>) -> Self {
        if steps.is_empty() {
            Self::default()
        } else {
            Self(steps)
        }
    }

    pub fn add_step(&mut self) {
        self.0.push(String::new());
    }

    pub fn update_step(&mut self, index: usize, text: impl Into<String>) -> DomainResult<()> {
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or_else(|| step_out_of_range(index, len))?;
        *slot = text.into();
        Ok(())
    }

    /// Removes a step. Removing the last remaining step clears its text instead.
    pub fn remove_step(&mut self, index: usize) -> DomainResult<()> {
        if index >= self.0.len() {
            return Err(step_out_of_range(index, self.0.len()));
        }
        if self.0.len() == 1 {
            self.0[0].clear();
        } else {
            self.0.remove(index);
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

fn step_out_of_range(index: usize, len: usize) -> DomainError {
    DomainError::Validation(format!("step {index} out of range (recipe has {len} steps)"))
}

/// Raw image picked by the user, uploaded through the `BlobStore` on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub data: Bytes,
    pub content_type: mime::Mime,
}

/// Form state of the recipe creation screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    /// `None` until the user picks a category
    pub category: Option<Category>,
    pub ingredients: String,
    pub steps: StepList,
    pub image: Option<ImageUpload>,
}

impl RecipeDraft {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Image URIs used when a recipe is created without a picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultImages {
    pub peixe: String,
    pub carne: String,
    pub vegetariano: String,
    pub pastelaria: String,
}

impl Default for DefaultImages {
    fn default() -> Self {
        Self {
            peixe: "https://firebasestorage.googleapis.com/v0/b/cookingapp2-1871c.appspot.com/o/recipes%2F1728504346451.jpg?alt=media&token=aa87a315-14b1-4ddb-852e-b0785de7bb86".to_string(),
            carne: "https://firebasestorage.googleapis.com/v0/b/cookingapp2-1871c.appspot.com/o/recipes%2F1728504301755.jpg?alt=media&token=94fcfcd6-2845-488f-a82b-323d429acc48".to_string(),
            vegetariano: "https://firebasestorage.googleapis.com/v0/b/cookingapp2-1871c.appspot.com/o/recipes%2F1728504194331.jpg?alt=media&token=8657bfd2-88af-4fd3-90e5-c3285a1c295b".to_string(),
            pastelaria: "https://firebasestorage.googleapis.com/v0/b/cookingapp2-1871c.appspot.com/o/recipes%2F1728504254467.jpg?alt=media&token=3157690f-cff1-4ac5-956a-af22a68ea735".to_string(),
        }
    }
}

impl DefaultImages {
    pub fn for_category(&self, category: Category) -> &str {
        match category {
            Category::Fish => &self.peixe,
            Category::Meat => &self.carne,
            Category::Vegetarian => &self.vegetariano,
            Category::Pastry => &self.pastelaria,
        }
    }
}
