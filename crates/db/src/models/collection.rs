//! Collection and collection item models and DTOs.

use courier_core::request::HttpMethod;
use courier_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `collections` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: EntityId,
    pub owner_id: String,
    pub name: String,
    pub created_at: Timestamp,
}

/// A row from the `collection_items` table.
///
/// `url`, `headers` and `body` hold the unresolved template text so an item
/// can be replayed against any environment.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    pub id: EntityId,
    pub collection_id: EntityId,
    pub owner_id: String,
    pub name: String,
    pub method: String,
    pub url: String,
    pub headers: String,
    pub body: String,
    pub created_at: Timestamp,
}

/// A collection together with its items, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionWithItems {
    #[serde(flatten)]
    pub collection: Collection,
    pub items: Vec<CollectionItem>,
}

/// DTO for saving a request snapshot into a collection.
#[derive(Debug, Clone)]
pub struct NewCollectionItem {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: String,
    pub body: String,
}
