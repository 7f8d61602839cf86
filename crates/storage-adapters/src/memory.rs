//! # In-memory document stores
//!
//! `RecipeStore` and `SuggestionStore` backed by concurrent maps of JSON
//! documents. Listing order is insertion order, like a document collection
//! read back without an explicit `ORDER BY`.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{
    DomainError, DomainResult, NewRecipe, Recipe, RecipePatch, RecipeStore, SuggestionStore,
    UserId,
};
use serde_json::Value;
use uuid::Uuid;

use crate::documents::{apply_patch, decode_recipe, encode_new_recipe, owner_of};

struct StoredDocument {
    seq: u64,
    body: Value,
}

/// A named collection of documents keyed by id.
struct DocumentCollection {
    name: &'static str,
    docs: DashMap<String, StoredDocument>,
    next_seq: AtomicU64,
}

impl DocumentCollection {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    fn insert(&self, id: String, body: Value) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.docs.insert(id, StoredDocument { seq, body });
    }

    /// Snapshot of (id, body) pairs in insertion order.
    fn ordered(&self) -> Vec<(String, Value)> {
        let mut rows: Vec<(u64, String, Value)> = self
            .docs
            .iter()
            .map(|entry| (entry.seq, entry.key().clone(), entry.body.clone()))
            .collect();
        rows.sort_by_key(|(seq, _, _)| *seq);
        rows.into_iter().map(|(_, id, body)| (id, body)).collect()
    }

    fn decode_all(&self, rows: Vec<(String, Value)>) -> DomainResult<Vec<Recipe>> {
        rows.iter()
            .map(|(id, body)| {
                decode_recipe(id, body).inspect_err(|e| {
                    tracing::warn!(
                        collection = self.name,
                        error = %e,
                        "rejecting malformed document"
                    );
                })
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.docs.len()
    }
}

/// User-owned recipes. Ownership is checked on every write.
pub struct InMemoryRecipeStore {
    collection: DocumentCollection,
}

impl Default for InMemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self {
            collection: DocumentCollection::new("recipe"),
        }
    }

    /// Inserts a raw document under a caller-chosen id, bypassing encoding.
    pub fn insert_document(&self, id: impl Into<String>, body: Value) {
        self.collection.insert(id.into(), body);
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_owner(&self, owner: &UserId, id: &str) -> DomainResult<()> {
        let doc = self
            .collection
            .docs
            .get(id)
            .ok_or_else(|| DomainError::not_found("Recipe", id))?;
        if owner_of(&doc.body) != Some(owner.as_str()) {
            return Err(DomainError::Unauthorized(format!(
                "recipe {id} is not owned by {owner}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn list_by_user(&self, user: &UserId) -> DomainResult<Vec<Recipe>> {
        let rows: Vec<_> = self
            .collection
            .ordered()
            .into_iter()
            .filter(|(_, body)| owner_of(body) == Some(user.as_str()))
            .collect();
        self.collection.decode_all(rows)
    }

    async fn create(&self, recipe: NewRecipe) -> DomainResult<String> {
        let body = encode_new_recipe(&recipe)?;
        let id = Uuid::new_v4().simple().to_string();
        self.collection.insert(id.clone(), body);
        tracing::debug!(recipe_id = %id, user_id = %recipe.user_id, "recipe document created");
        Ok(id)
    }

    async fn update(&self, owner: &UserId, id: &str, patch: RecipePatch) -> DomainResult<()> {
        self.check_owner(owner, id)?;
        let mut doc = self
            .collection
            .docs
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Recipe", id))?;
        apply_patch(id, &mut doc.body, &patch)?;
        tracing::debug!(recipe_id = %id, field = patch.field_name(), "recipe document updated");
        Ok(())
    }

    async fn delete(&self, owner: &UserId, id: &str) -> DomainResult<()> {
        self.check_owner(owner, id)?;
        self.collection
            .docs
            .remove(id)
            .ok_or_else(|| DomainError::not_found("Recipe", id))?;
        tracing::debug!(recipe_id = %id, "recipe document deleted");
        Ok(())
    }
}

/// Shared suggestion recipes, seeded once and read by every user.
pub struct InMemorySuggestionStore {
    collection: DocumentCollection,
}

impl Default for InMemorySuggestionStore {
    fn default() -> Self {
        Self {
            collection: DocumentCollection::new("suggestRecipe"),
        }
    }
}

impl InMemorySuggestionStore {
    /// Seeds from raw documents. A string `id` field is used as the document
    /// id and stripped from the body; otherwise one is generated.
    pub fn from_documents(documents: Vec<Value>) -> Self {
        let store = Self::default();
        for mut body in documents {
            let id = body
                .as_object_mut()
                .and_then(|fields| fields.remove("id"))
                .and_then(|id| id.as_str().map(str::to_string))
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
            store.collection.insert(id, body);
        }
        store
    }

    /// Seeds from a JSON file holding an array of recipe documents.
    pub async fn from_json_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Store(format!("reading {}: {e}", path.display())))?;
        let documents: Vec<Value> = serde_json::from_str(&raw).map_err(|e| DomainError::Decode {
            id: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), count = documents.len(), "seeding suggestions");
        Ok(Self::from_documents(documents))
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SuggestionStore for InMemorySuggestionStore {
    async fn list_all(&self) -> DomainResult<Vec<Recipe>> {
        let mut recipes = self.collection.decode_all(self.collection.ordered())?;
        for recipe in &mut recipes {
            recipe.is_suggested = true;
        }
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::Category;
    use serde_json::json;

    fn new_recipe(name: &str, category: Category, owner: &str) -> NewRecipe {
        NewRecipe {
            name: name.into(),
            category,
            image: "uri".into(),
            ingredients: String::new(),
            steps: vec!["passo".into()],
            date: 1,
            user_id: UserId::from(owner),
        }
    }

    #[tokio::test]
    async fn lists_only_the_owners_recipes_in_insertion_order() {
        let store = InMemoryRecipeStore::new();
        let a = store.create(new_recipe("A", Category::Meat, "u1")).await.unwrap();
        store.create(new_recipe("B", Category::Fish, "u2")).await.unwrap();
        let c = store.create(new_recipe("C", Category::Pastry, "u1")).await.unwrap();

        let listed = store.list_by_user(&UserId::from("u1")).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[tokio::test]
    async fn delete_enforces_ownership_and_existence() {
        let store = InMemoryRecipeStore::new();
        let id = store.create(new_recipe("A", Category::Meat, "u1")).await.unwrap();

        let err = store.delete(&UserId::from("u2"), &id).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert_eq!(store.len(), 1);

        store.delete(&UserId::from("u1"), &id).await.unwrap();
        assert!(store.is_empty());

        let err = store.delete(&UserId::from("u1"), &id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_replaces_steps() {
        let store = InMemoryRecipeStore::new();
        let owner = UserId::from("u1");
        let id = store.create(new_recipe("A", Category::Meat, "u1")).await.unwrap();
        store
            .update(&owner, &id, RecipePatch::Steps(vec!["um".into(), "dois".into()]))
            .await
            .unwrap();
        let recipe = store.list_by_user(&owner).await.unwrap().remove(0);
        assert_eq!(recipe.steps, vec!["um".to_string(), "dois".to_string()]);
    }

    #[tokio::test]
    async fn malformed_document_fails_the_listing() {
        let store = InMemoryRecipeStore::new();
        store.insert_document("bad", json!({ "userId": "u1", "type": "carne" }));
        let err = store.list_by_user(&UserId::from("u1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Decode { .. }));
    }

    #[test]
    fn suggestions_are_flagged() {
        let store = InMemorySuggestionStore::from_documents(vec![
            json!({ "id": "s1", "name": "Polvo", "type": "peixe" }),
            json!({ "name": "Quiche", "type": "vegetariano" }),
        ]);
        let listed = tokio_test::block_on(store.list_all()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "s1");
        assert!(listed.iter().all(|r| r.is_suggested));
    }
}
