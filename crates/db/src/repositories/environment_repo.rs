//! Repository for the `environments` table.

use courier_core::types::EntityId;
use sqlx::PgPool;

use crate::models::environment::{Environment, UpsertEnvironment};

const COLUMNS: &str = "id, owner_id, name, variables, created_at, updated_at";

/// Provides CRUD operations for environments.
pub struct EnvironmentRepo;

impl EnvironmentRepo {
    /// List an owner's environments, oldest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: &str,
    ) -> Result<Vec<Environment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM environments \
             WHERE owner_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Environment>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find one of an owner's environments by ID.
    pub async fn find_for_owner(
        pool: &PgPool,
        owner_id: &str,
        id: EntityId,
    ) -> Result<Option<Environment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM environments WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Environment>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace an environment.
    ///
    /// The conflict branch only fires for rows of the same owner, so `None`
    /// means the id exists under another owner.
    pub async fn upsert(
        pool: &PgPool,
        owner_id: &str,
        id: EntityId,
        input: &UpsertEnvironment,
    ) -> Result<Option<Environment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO environments (id, owner_id, name, variables) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                name = EXCLUDED.name, \
                variables = EXCLUDED.variables, \
                updated_at = now() \
             WHERE environments.owner_id = EXCLUDED.owner_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Environment>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.variables)
            .fetch_optional(pool)
            .await
    }

    /// Delete an owner's environment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner_id: &str, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM environments WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
