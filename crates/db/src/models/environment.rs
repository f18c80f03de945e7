//! Environment model and DTOs.

use courier_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `environments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: EntityId,
    pub owner_id: String,
    pub name: String,
    /// Stored JSON object of variables.
    pub variables: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating (no `id`) or replacing (with `id`) an environment.
#[derive(Debug, Clone)]
pub struct UpsertEnvironment {
    pub id: Option<EntityId>,
    pub name: String,
    pub variables: serde_json::Value,
}
