//! Repository for the append-only `history` table.

use sqlx::PgPool;

use crate::models::history::{HistoryRecord, NewHistoryRecord};

const COLUMNS: &str = "id, owner_id, method, url, headers, body, status, created_at";

/// Provides insert and newest-first listing for history records.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append a record, returning the stored row.
    pub async fn insert(
        pool: &PgPool,
        record: &NewHistoryRecord,
    ) -> Result<HistoryRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO history (id, owner_id, method, url, headers, body, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(uuid::Uuid::new_v4())
            .bind(record.owner_id.as_str())
            .bind(record.method.as_str())
            .bind(&record.url)
            .bind(&record.headers)
            .bind(&record.body)
            .bind(i32::from(record.status))
            .bind(record.created_at)
            .fetch_one(pool)
            .await
    }

    /// List an owner's most recent records, newest first. Records with
    /// the same timestamp come back in reverse insertion order.
    pub async fn list_recent(
        pool: &PgPool,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, seq DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, HistoryRecord>(&query)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
