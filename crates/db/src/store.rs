//! Store traits shared by the in-memory and PostgreSQL backends.
//!
//! Every operation is scoped by [`OwnerId`]; a backend never returns or
//! mutates another owner's rows. Upserts are atomic per record.

use async_trait::async_trait;
use courier_core::types::{EntityId, OwnerId};

use crate::models::collection::{Collection, CollectionItem, CollectionWithItems, NewCollectionItem};
use crate::models::environment::{Environment, UpsertEnvironment};
use crate::models::history::{HistoryRecord, NewHistoryRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    /// Oldest first.
    async fn list_environments(&self, owner: &OwnerId) -> StoreResult<Vec<Environment>>;

    async fn get_environment(
        &self,
        owner: &OwnerId,
        id: EntityId,
    ) -> StoreResult<Option<Environment>>;

    /// Insert when `input.id` is absent or unknown, replace when it names an
    /// environment of `owner`. An id owned by someone else is `NotFound`.
    async fn upsert_environment(
        &self,
        owner: &OwnerId,
        input: &UpsertEnvironment,
    ) -> StoreResult<Environment>;

    /// Returns whether a row was removed. Deleting an unknown id is not an error.
    async fn delete_environment(&self, owner: &OwnerId, id: EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert_history(&self, record: &NewHistoryRecord) -> StoreResult<HistoryRecord>;

    /// Newest first, at most `limit` rows.
    async fn list_history(&self, owner: &OwnerId, limit: usize) -> StoreResult<Vec<HistoryRecord>>;
}

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Oldest first, each with its items oldest first.
    async fn list_collections(&self, owner: &OwnerId) -> StoreResult<Vec<CollectionWithItems>>;

    async fn create_collection(&self, owner: &OwnerId, name: &str) -> StoreResult<Collection>;

    /// Fails with `NotFound` unless `collection_id` belongs to `owner`.
    async fn insert_collection_item(
        &self,
        owner: &OwnerId,
        collection_id: EntityId,
        input: &NewCollectionItem,
    ) -> StoreResult<CollectionItem>;
}

/// Umbrella trait for a complete backend.
#[async_trait]
pub trait Store: EnvironmentStore + HistoryStore + CollectionStore {
    async fn health_check(&self) -> StoreResult<()>;
}
