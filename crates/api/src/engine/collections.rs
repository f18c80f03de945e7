//! Collections and the Collection Item Saver.
//!
//! Items are saved with their template tokens intact so they can be run
//! against any environment later.

use serde::Deserialize;
use serde_json::Value;

use courier_core::types::{EntityId, OwnerId};
use courier_core::validation::{item_method, require_collection, require_owner, validate_name};
use courier_db::models::collection::{
    Collection, CollectionItem, CollectionWithItems, NewCollectionItem,
};
use courier_db::{CollectionStore, StoreResult};

use crate::error::AppResult;

/// A request snapshot as submitted for saving.
///
/// Headers and body arrive either as raw editor text or as already-parsed
/// JSON; both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDraft {
    pub name: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<Value>,
    pub body: Option<Value>,
}

/// Text kept in the store for a header or body field.
///
/// Strings are kept verbatim so template tokens survive. Any other JSON
/// value is stored as its serialized form, and null as empty text.
fn stored_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// The owner's collections with their items. No owner, no collections.
pub async fn list<S>(store: &S, owner: Option<&OwnerId>) -> StoreResult<Vec<CollectionWithItems>>
where
    S: CollectionStore + ?Sized,
{
    match owner {
        Some(owner) => store.list_collections(owner).await,
        None => Ok(Vec::new()),
    }
}

pub async fn create<S>(store: &S, owner: Option<OwnerId>, name: Option<&str>) -> AppResult<Collection>
where
    S: CollectionStore + ?Sized,
{
    let owner = require_owner(owner)?;
    let name = validate_name(name)?;

    let created = store.create_collection(&owner, &name).await?;
    tracing::info!(owner_id = %owner, id = %created.id, name = %created.name, "Collection created");
    Ok(created)
}

/// Save `draft` into `collection_id`.
///
/// Every input check runs before the store is touched. Header and body
/// text are stored verbatim.
pub async fn save_item<S>(
    store: &S,
    collection_id: Option<EntityId>,
    owner: Option<OwnerId>,
    draft: &ItemDraft,
) -> AppResult<CollectionItem>
where
    S: CollectionStore + ?Sized,
{
    let collection_id = require_collection(collection_id)?;
    let owner = require_owner(owner)?;
    let name = validate_name(draft.name.as_deref())?;
    let method = item_method(draft.method.as_deref())?;

    let input = NewCollectionItem {
        name,
        method,
        url: draft.url.clone().unwrap_or_default(),
        headers: stored_text(draft.headers.as_ref()),
        body: stored_text(draft.body.as_ref()),
    };

    let item = store
        .insert_collection_item(&owner, collection_id, &input)
        .await?;
    tracing::info!(
        owner_id = %owner,
        collection_id = %collection_id,
        id = %item.id,
        "Collection item saved"
    );
    Ok(item)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use courier_core::error::CoreError;
    use courier_db::{MemoryStore, StoreError};
    use serde_json::json;

    use super::*;
    use crate::error::AppError;

    /// Counts writes and delegates to a memory store.
    #[derive(Default)]
    struct CountingStore {
        writes: AtomicUsize,
        inner: MemoryStore,
    }

    #[async_trait]
    impl CollectionStore for CountingStore {
        async fn list_collections(&self, owner: &OwnerId) -> StoreResult<Vec<CollectionWithItems>> {
            self.inner.list_collections(owner).await
        }

        async fn create_collection(&self, owner: &OwnerId, name: &str) -> StoreResult<Collection> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create_collection(owner, name).await
        }

        async fn insert_collection_item(
            &self,
            owner: &OwnerId,
            collection_id: EntityId,
            input: &NewCollectionItem,
        ) -> StoreResult<CollectionItem> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner
                .insert_collection_item(owner, collection_id, input)
                .await
        }
    }

    fn alice() -> Option<OwnerId> {
        OwnerId::parse(Some("alice"))
    }

    fn item(name: &str) -> ItemDraft {
        ItemDraft {
            name: Some(name.to_string()),
            method: Some("POST".into()),
            url: Some("{{baseUrl}}/users".into()),
            headers: Some(r#"{"Authorization": "Bearer {{token}}"}"#.into()),
            body: Some(r#"{"name": "{{user}}"}"#.into()),
        }
    }

    #[tokio::test]
    async fn empty_name_performs_no_write() {
        let store = CountingStore::default();
        let collection = create(&store, alice(), Some("Users")).await.unwrap();
        let before = store.writes.load(Ordering::SeqCst);

        assert_matches!(
            save_item(&store, Some(collection.id), alice(), &item("")).await,
            Err(AppError::Core(CoreError::MissingField("name")))
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn missing_collection_performs_no_write() {
        let store = CountingStore::default();

        assert_matches!(
            save_item(&store, None, alice(), &item("List users")).await,
            Err(AppError::Core(CoreError::MissingField("collectionId")))
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn saved_item_keeps_template_tokens() {
        let store = MemoryStore::new();
        let collection = create(&store, alice(), Some("Users")).await.unwrap();

        let saved = save_item(&store, Some(collection.id), alice(), &item("Create user"))
            .await
            .unwrap();

        assert_eq!(saved.collection_id, collection.id);
        assert_eq!(saved.method, "POST");
        assert_eq!(saved.url, "{{baseUrl}}/users");
        assert_eq!(saved.headers, r#"{"Authorization": "Bearer {{token}}"}"#);
        assert_eq!(saved.body, r#"{"name": "{{user}}"}"#);

        let listed = list(&store, alice().as_ref()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items, vec![saved]);
    }

    #[test]
    fn stored_text_handles_each_shape() {
        assert_eq!(stored_text(None), "");
        assert_eq!(stored_text(Some(&Value::Null)), "");
        assert_eq!(stored_text(Some(&json!("{{token}}"))), "{{token}}");
        assert_eq!(
            stored_text(Some(&json!({"Authorization": "Bearer {{token}}"}))),
            r#"{"Authorization":"Bearer {{token}}"}"#
        );
        assert_eq!(stored_text(Some(&json!([1, 2]))), "[1,2]");
    }

    #[tokio::test]
    async fn parsed_json_fields_are_serialized() {
        let store = MemoryStore::new();
        let collection = create(&store, alice(), Some("Users")).await.unwrap();
        let draft = ItemDraft {
            name: Some("Create user".into()),
            method: Some("POST".into()),
            url: Some("{{baseUrl}}/users".into()),
            headers: Some(json!({"Content-Type": "application/json"})),
            body: Some(json!({"name": "{{user}}"})),
        };

        let saved = save_item(&store, Some(collection.id), alice(), &draft).await.unwrap();
        assert_eq!(saved.headers, r#"{"Content-Type":"application/json"}"#);
        assert_eq!(saved.body, r#"{"name":"{{user}}"}"#);
    }

    #[tokio::test]
    async fn method_defaults_to_get() {
        let store = MemoryStore::new();
        let collection = create(&store, alice(), Some("Users")).await.unwrap();
        let draft = ItemDraft {
            name: Some("Ping".into()),
            ..ItemDraft::default()
        };

        let saved = save_item(&store, Some(collection.id), alice(), &draft).await.unwrap();
        assert_eq!(saved.method, "GET");
        assert_eq!(saved.url, "");
    }

    #[tokio::test]
    async fn foreign_collection_is_not_found() {
        let store = MemoryStore::new();
        let collection = create(&store, alice(), Some("Users")).await.unwrap();

        assert_matches!(
            save_item(&store, Some(collection.id), OwnerId::parse(Some("bob")), &item("Steal")).await,
            Err(AppError::Store(StoreError::NotFound { .. }))
        );
    }

    #[tokio::test]
    async fn create_requires_name_and_owner() {
        let store = CountingStore::default();
        assert_matches!(
            create(&store, alice(), Some("")).await,
            Err(AppError::Core(CoreError::MissingField("name")))
        );
        assert_matches!(
            create(&store, None, Some("Users")).await,
            Err(AppError::Core(CoreError::MissingField("userId")))
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }
}
