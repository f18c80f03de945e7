//! In-memory implementation of the store traits.
//!
//! Maps guarded by a single `tokio::sync::RwLock`; state is lost on
//! restart. Used by tests and when no `DATABASE_URL` is configured. A
//! per-store insertion sequence breaks `created_at` ties so orderings are
//! deterministic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use courier_core::types::{EntityId, OwnerId};
use tokio::sync::RwLock;

use crate::models::collection::{Collection, CollectionItem, CollectionWithItems, NewCollectionItem};
use crate::models::environment::{Environment, UpsertEnvironment};
use crate::models::history::{HistoryRecord, NewHistoryRecord};
use crate::store::{
    CollectionStore, EnvironmentStore, HistoryStore, Store, StoreError, StoreResult,
};

/// A stored value tagged with its insertion sequence.
#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    environments: HashMap<EntityId, Entry<Environment>>,
    history: Vec<Entry<HistoryRecord>>,
    collections: HashMap<EntityId, Entry<Collection>>,
    items: Vec<Entry<CollectionItem>>,
}

impl Inner {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnvironmentStore for MemoryStore {
    async fn list_environments(&self, owner: &OwnerId) -> StoreResult<Vec<Environment>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry<Environment>> = inner
            .environments
            .values()
            .filter(|e| e.value.owner_id == owner.as_str())
            .collect();
        entries.sort_by_key(|e| (e.value.created_at, e.seq));
        Ok(entries.into_iter().map(|e| e.value.clone()).collect())
    }

    async fn get_environment(
        &self,
        owner: &OwnerId,
        id: EntityId,
    ) -> StoreResult<Option<Environment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .environments
            .get(&id)
            .filter(|e| e.value.owner_id == owner.as_str())
            .map(|e| e.value.clone()))
    }

    async fn upsert_environment(
        &self,
        owner: &OwnerId,
        input: &UpsertEnvironment,
    ) -> StoreResult<Environment> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let id = input.id.unwrap_or_else(uuid::Uuid::new_v4);

        if let Some(existing) = inner.environments.get_mut(&id) {
            if existing.value.owner_id != owner.as_str() {
                return Err(StoreError::NotFound {
                    entity: "Environment",
                    id,
                });
            }
            existing.value.name = input.name.clone();
            existing.value.variables = input.variables.clone();
            existing.value.updated_at = now;
            return Ok(existing.value.clone());
        }

        let environment = Environment {
            id,
            owner_id: owner.as_str().to_string(),
            name: input.name.clone(),
            variables: input.variables.clone(),
            created_at: now,
            updated_at: now,
        };
        let seq = inner.seq();
        inner.environments.insert(
            id,
            Entry {
                seq,
                value: environment.clone(),
            },
        );
        Ok(environment)
    }

    async fn delete_environment(&self, owner: &OwnerId, id: EntityId) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .environments
            .get(&id)
            .is_some_and(|e| e.value.owner_id == owner.as_str());
        if owned {
            inner.environments.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn insert_history(&self, record: &NewHistoryRecord) -> StoreResult<HistoryRecord> {
        let mut inner = self.inner.write().await;
        let stored = HistoryRecord {
            id: uuid::Uuid::new_v4(),
            owner_id: record.owner_id.as_str().to_string(),
            method: record.method.as_str().to_string(),
            url: record.url.clone(),
            headers: record.headers.clone(),
            body: record.body.clone(),
            status: i32::from(record.status),
            created_at: record.created_at,
        };
        let seq = inner.seq();
        inner.history.push(Entry {
            seq,
            value: stored.clone(),
        });
        Ok(stored)
    }

    async fn list_history(&self, owner: &OwnerId, limit: usize) -> StoreResult<Vec<HistoryRecord>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry<HistoryRecord>> = inner
            .history
            .iter()
            .filter(|e| e.value.owner_id == owner.as_str())
            .collect();
        entries.sort_by(|a, b| {
            (b.value.created_at, b.seq).cmp(&(a.value.created_at, a.seq))
        });
        Ok(entries
            .into_iter()
            .take(limit)
            .map(|e| e.value.clone())
            .collect())
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn list_collections(&self, owner: &OwnerId) -> StoreResult<Vec<CollectionWithItems>> {
        let inner = self.inner.read().await;

        let mut collections: Vec<&Entry<Collection>> = inner
            .collections
            .values()
            .filter(|e| e.value.owner_id == owner.as_str())
            .collect();
        collections.sort_by_key(|e| (e.value.created_at, e.seq));

        Ok(collections
            .into_iter()
            .map(|c| {
                let mut items: Vec<&Entry<CollectionItem>> = inner
                    .items
                    .iter()
                    .filter(|i| i.value.collection_id == c.value.id)
                    .collect();
                items.sort_by_key(|i| (i.value.created_at, i.seq));
                CollectionWithItems {
                    collection: c.value.clone(),
                    items: items.into_iter().map(|i| i.value.clone()).collect(),
                }
            })
            .collect())
    }

    async fn create_collection(&self, owner: &OwnerId, name: &str) -> StoreResult<Collection> {
        let mut inner = self.inner.write().await;
        let collection = Collection {
            id: uuid::Uuid::new_v4(),
            owner_id: owner.as_str().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let seq = inner.seq();
        inner.collections.insert(
            collection.id,
            Entry {
                seq,
                value: collection.clone(),
            },
        );
        Ok(collection)
    }

    async fn insert_collection_item(
        &self,
        owner: &OwnerId,
        collection_id: EntityId,
        input: &NewCollectionItem,
    ) -> StoreResult<CollectionItem> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .collections
            .get(&collection_id)
            .is_some_and(|c| c.value.owner_id == owner.as_str());
        if !owned {
            return Err(StoreError::NotFound {
                entity: "Collection",
                id: collection_id,
            });
        }

        let item = CollectionItem {
            id: uuid::Uuid::new_v4(),
            collection_id,
            owner_id: owner.as_str().to_string(),
            name: input.name.clone(),
            method: input.method.as_str().to_string(),
            url: input.url.clone(),
            headers: input.headers.clone(),
            body: input.body.clone(),
            created_at: Utc::now(),
        };
        let seq = inner.seq();
        inner.items.push(Entry {
            seq,
            value: item.clone(),
        });
        Ok(item)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use courier_core::request::HttpMethod;
    use serde_json::json;

    use super::*;

    fn owner(id: &str) -> OwnerId {
        OwnerId::parse(Some(id)).unwrap()
    }

    fn env_input(id: Option<EntityId>, name: &str) -> UpsertEnvironment {
        UpsertEnvironment {
            id,
            name: name.to_string(),
            variables: json!({"baseUrl": "https://api.example.com"}),
        }
    }

    fn history(owner_id: &OwnerId, n: i64) -> NewHistoryRecord {
        NewHistoryRecord {
            owner_id: owner_id.clone(),
            method: HttpMethod::Get,
            url: format!("https://example.com/{n}"),
            headers: "{}".into(),
            body: String::new(),
            status: 200,
            created_at: Utc::now() + Duration::milliseconds(n),
        }
    }

    // --- Environments ---

    #[tokio::test]
    async fn upsert_without_id_inserts() {
        let store = MemoryStore::new();
        let alice = owner("alice");

        let created = store.upsert_environment(&alice, &env_input(None, "Dev")).await.unwrap();
        assert_eq!(created.name, "Dev");
        assert_eq!(created.owner_id, "alice");

        let listed = store.list_environments(&alice).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn upsert_with_id_updates_in_place() {
        let store = MemoryStore::new();
        let alice = owner("alice");
        let created = store.upsert_environment(&alice, &env_input(None, "Dev")).await.unwrap();

        let updated = store
            .upsert_environment(&alice, &env_input(Some(created.id), "Staging"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Staging");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.list_environments(&alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_of_foreign_id_is_not_found() {
        let store = MemoryStore::new();
        let created = store
            .upsert_environment(&owner("alice"), &env_input(None, "Dev"))
            .await
            .unwrap();

        let result = store
            .upsert_environment(&owner("mallory"), &env_input(Some(created.id), "Pwned"))
            .await;
        assert_matches!(result, Err(StoreError::NotFound { entity: "Environment", .. }));

        let original = store
            .get_environment(&owner("alice"), created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(original.name, "Dev");
    }

    #[tokio::test]
    async fn environments_list_oldest_first_and_scoped_by_owner() {
        let store = MemoryStore::new();
        let alice = owner("alice");
        let first = store.upsert_environment(&alice, &env_input(None, "one")).await.unwrap();
        let second = store.upsert_environment(&alice, &env_input(None, "two")).await.unwrap();
        store
            .upsert_environment(&owner("bob"), &env_input(None, "bobs"))
            .await
            .unwrap();

        let names: Vec<_> = store
            .list_environments(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(names, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_owner_scoped() {
        let store = MemoryStore::new();
        let alice = owner("alice");
        let env = store.upsert_environment(&alice, &env_input(None, "Dev")).await.unwrap();

        assert!(!store.delete_environment(&owner("bob"), env.id).await.unwrap());
        assert!(store.delete_environment(&alice, env.id).await.unwrap());
        assert!(!store.delete_environment(&alice, env.id).await.unwrap());
        assert!(store.get_environment(&alice, env.id).await.unwrap().is_none());
    }

    // --- History ---

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        let alice = owner("alice");
        for n in 0..25 {
            store.insert_history(&history(&alice, n)).await.unwrap();
        }
        store.insert_history(&history(&owner("bob"), 100)).await.unwrap();

        let records = store.list_history(&alice, 20).await.unwrap();
        assert_eq!(records.len(), 20);
        assert_eq!(records[0].url, "https://example.com/24");
        assert_eq!(records[19].url, "https://example.com/5");
        assert!(records.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[tokio::test]
    async fn history_ties_break_by_insertion_order() {
        let store = MemoryStore::new();
        let alice = owner("alice");
        let at = Utc::now();
        for n in 0..3 {
            let mut record = history(&alice, n);
            record.created_at = at;
            store.insert_history(&record).await.unwrap();
        }

        let urls: Vec<_> = store
            .list_history(&alice, 20)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/2",
                "https://example.com/1",
                "https://example.com/0"
            ]
        );
    }

    // --- Collections ---

    #[tokio::test]
    async fn collections_include_their_items() {
        let store = MemoryStore::new();
        let alice = owner("alice");
        let users = store.create_collection(&alice, "Users").await.unwrap();
        let empty = store.create_collection(&alice, "Empty").await.unwrap();

        let item = store
            .insert_collection_item(
                &alice,
                users.id,
                &NewCollectionItem {
                    name: "List users".into(),
                    method: HttpMethod::Get,
                    url: "{{baseUrl}}/users".into(),
                    headers: String::new(),
                    body: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(item.url, "{{baseUrl}}/users");

        let listed = store.list_collections(&alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].collection.id, users.id);
        assert_eq!(listed[0].items, vec![item]);
        assert_eq!(listed[1].collection.id, empty.id);
        assert!(listed[1].items.is_empty());
    }

    #[tokio::test]
    async fn item_insert_requires_owned_collection() {
        let store = MemoryStore::new();
        let users = store.create_collection(&owner("alice"), "Users").await.unwrap();
        let input = NewCollectionItem {
            name: "x".into(),
            method: HttpMethod::Get,
            url: "http://x".into(),
            headers: String::new(),
            body: String::new(),
        };

        assert_matches!(
            store.insert_collection_item(&owner("bob"), users.id, &input).await,
            Err(StoreError::NotFound { entity: "Collection", .. })
        );
        assert_matches!(
            store
                .insert_collection_item(&owner("alice"), uuid::Uuid::new_v4(), &input)
                .await,
            Err(StoreError::NotFound { .. })
        );
    }
}
