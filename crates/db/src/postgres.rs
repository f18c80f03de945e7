//! PostgreSQL-backed [`Store`] delegating to the repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use courier_core::types::{EntityId, OwnerId};

use crate::models::collection::{Collection, CollectionItem, CollectionWithItems, NewCollectionItem};
use crate::models::environment::{Environment, UpsertEnvironment};
use crate::models::history::{HistoryRecord, NewHistoryRecord};
use crate::repositories::{CollectionRepo, EnvironmentRepo, HistoryRepo};
use crate::store::{
    CollectionStore, EnvironmentStore, HistoryStore, Store, StoreError, StoreResult,
};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect, verify the connection and apply migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = crate::create_pool(database_url).await?;
        tracing::info!("Database connection pool created");

        crate::health_check(&pool).await?;
        crate::run_migrations(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl EnvironmentStore for PgStore {
    async fn list_environments(&self, owner: &OwnerId) -> StoreResult<Vec<Environment>> {
        Ok(EnvironmentRepo::list_for_owner(&self.pool, owner.as_str()).await?)
    }

    async fn get_environment(
        &self,
        owner: &OwnerId,
        id: EntityId,
    ) -> StoreResult<Option<Environment>> {
        Ok(EnvironmentRepo::find_for_owner(&self.pool, owner.as_str(), id).await?)
    }

    async fn upsert_environment(
        &self,
        owner: &OwnerId,
        input: &UpsertEnvironment,
    ) -> StoreResult<Environment> {
        let id = input.id.unwrap_or_else(uuid::Uuid::new_v4);
        EnvironmentRepo::upsert(&self.pool, owner.as_str(), id, input)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Environment",
                id,
            })
    }

    async fn delete_environment(&self, owner: &OwnerId, id: EntityId) -> StoreResult<bool> {
        Ok(EnvironmentRepo::delete(&self.pool, owner.as_str(), id).await?)
    }
}

#[async_trait]
impl HistoryStore for PgStore {
    async fn insert_history(&self, record: &NewHistoryRecord) -> StoreResult<HistoryRecord> {
        Ok(HistoryRepo::insert(&self.pool, record).await?)
    }

    async fn list_history(&self, owner: &OwnerId, limit: usize) -> StoreResult<Vec<HistoryRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(HistoryRepo::list_recent(&self.pool, owner.as_str(), limit).await?)
    }
}

#[async_trait]
impl CollectionStore for PgStore {
    async fn list_collections(&self, owner: &OwnerId) -> StoreResult<Vec<CollectionWithItems>> {
        let collections = CollectionRepo::list_for_owner(&self.pool, owner.as_str()).await?;
        let items = CollectionRepo::list_items_for_owner(&self.pool, owner.as_str()).await?;
        Ok(group_items(collections, items))
    }

    async fn create_collection(&self, owner: &OwnerId, name: &str) -> StoreResult<Collection> {
        Ok(CollectionRepo::create(&self.pool, owner.as_str(), name).await?)
    }

    async fn insert_collection_item(
        &self,
        owner: &OwnerId,
        collection_id: EntityId,
        input: &NewCollectionItem,
    ) -> StoreResult<CollectionItem> {
        if !CollectionRepo::exists_for_owner(&self.pool, owner.as_str(), collection_id).await? {
            return Err(StoreError::NotFound {
                entity: "Collection",
                id: collection_id,
            });
        }
        Ok(CollectionRepo::insert_item(&self.pool, owner.as_str(), collection_id, input).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

/// Attach items to their collections, preserving both orderings.
fn group_items(
    collections: Vec<Collection>,
    items: Vec<CollectionItem>,
) -> Vec<CollectionWithItems> {
    let mut by_collection: HashMap<EntityId, Vec<CollectionItem>> = HashMap::new();
    for item in items {
        by_collection.entry(item.collection_id).or_default().push(item);
    }

    collections
        .into_iter()
        .map(|collection| CollectionWithItems {
            items: by_collection.remove(&collection.id).unwrap_or_default(),
            collection,
        })
        .collect()
}
