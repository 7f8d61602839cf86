//! # Document Mapping
//!
//! Recipes are kept as loosely-shaped JSON documents, the way a managed
//! document database hands them out. This module is the only place that turns
//! a document into a `Recipe`; anything that does not fit is a typed
//! `DomainError::Decode` instead of a half-filled record.

use domains::{DomainError, DomainResult, NewRecipe, Recipe, RecipePatch, UserId};
use serde::Deserialize;
use serde_json::Value;

/// Stored shape of a recipe document. The id lives outside the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeDocument {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    ingredients: String,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    date: i64,
    #[serde(default)]
    user_id: Option<UserId>,
}

pub fn decode_recipe(id: &str, body: &Value) -> DomainResult<Recipe> {
    let doc = RecipeDocument::deserialize(body).map_err(|e| DomainError::Decode {
        id: id.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Recipe {
        id: id.to_string(),
        name: doc.name,
        kind: doc.kind,
        image: doc.image,
        ingredients: doc.ingredients,
        steps: doc.steps,
        date: doc.date,
        user_id: doc.user_id,
        is_suggested: false,
    })
}

pub fn encode_new_recipe(recipe: &NewRecipe) -> DomainResult<Value> {
    serde_json::to_value(recipe).map_err(|e| DomainError::Store(e.to_string()))
}

/// Owner recorded on a document, if any.
pub fn owner_of(body: &Value) -> Option<&str> {
    body.get("userId").and_then(Value::as_str)
}

/// Replaces the patched field wholesale.
pub fn apply_patch(id: &str, body: &mut Value, patch: &RecipePatch) -> DomainResult<()> {
    let fields = body.as_object_mut().ok_or_else(|| DomainError::Decode {
        id: id.to_string(),
        reason: "document body is not an object".to_string(),
    })?;

    let value = match patch {
        RecipePatch::Ingredients(text) => Value::String(text.clone()),
        RecipePatch::Steps(steps) => {
            Value::Array(steps.iter().cloned().map(Value::String).collect())
        }
    };
    fields.insert(patch.field_name().to_string(), value);
    Ok(())
}
