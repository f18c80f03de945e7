//! History record model and DTO.

use courier_core::request::HttpMethod;
use courier_core::types::{EntityId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `history` table. Append-only.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: EntityId,
    pub owner_id: String,
    pub method: String,
    pub url: String,
    /// Raw header text as sent.
    pub headers: String,
    /// Raw body text as sent.
    pub body: String,
    /// Remote status, `0` when the remote was unreachable.
    pub status: i32,
    pub created_at: Timestamp,
}

/// DTO for appending a history record.
///
/// `created_at` is stamped when the dispatch completes, not when the write
/// lands, so queued writes keep dispatch order.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub owner_id: OwnerId,
    pub method: HttpMethod,
    pub url: String,
    pub headers: String,
    pub body: String,
    pub status: u16,
    pub created_at: Timestamp,
}
