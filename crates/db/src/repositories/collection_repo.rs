//! Repository for the `collections` and `collection_items` tables.

use courier_core::types::EntityId;
use sqlx::PgPool;

use crate::models::collection::{Collection, CollectionItem, NewCollectionItem};

const COLLECTION_COLUMNS: &str = "id, owner_id, name, created_at";

const ITEM_COLUMNS: &str =
    "id, collection_id, owner_id, name, method, url, headers, body, created_at";

/// Provides create/list operations for collections and their items.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        name: &str,
    ) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections (id, owner_id, name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLLECTION_COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(uuid::Uuid::new_v4())
            .bind(owner_id)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List an owner's collections, oldest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: &str,
    ) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections \
             WHERE owner_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `id` is a collection of `owner_id`.
    pub async fn exists_for_owner(
        pool: &PgPool,
        owner_id: &str,
        id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM collections WHERE id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// List all items of an owner's collections, oldest first.
    pub async fn list_items_for_owner(
        pool: &PgPool,
        owner_id: &str,
    ) -> Result<Vec<CollectionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM collection_items \
             WHERE owner_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, CollectionItem>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Insert an item into a collection, returning the created row.
    pub async fn insert_item(
        pool: &PgPool,
        owner_id: &str,
        collection_id: EntityId,
        input: &NewCollectionItem,
    ) -> Result<CollectionItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO collection_items \
                (id, collection_id, owner_id, name, method, url, headers, body) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CollectionItem>(&query)
            .bind(uuid::Uuid::new_v4())
            .bind(collection_id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(input.method.as_str())
            .bind(&input.url)
            .bind(&input.headers)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }
}
