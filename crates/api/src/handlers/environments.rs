//! Handlers for environments.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use courier_core::types::{EntityId, OwnerId};
use courier_db::models::environment::Environment;

use crate::engine::environment;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::query::OwnerParams;
use crate::state::AppState;

/// Body of `POST /environments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPayload {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    #[serde(default)]
    pub variables: Option<Value>,
    pub user_id: Option<String>,
}

/// GET /environments -- oldest first, empty without `userId`.
pub async fn list_environments(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> AppResult<Json<Vec<Environment>>> {
    let owner = params.owner();
    let items = environment::list(state.store.as_ref(), owner.as_ref()).await?;
    tracing::debug!(count = items.len(), "Listed environments");
    Ok(Json(items))
}

/// POST /environments -- create, or replace when `id` is given.
pub async fn upsert_environment(
    State(state): State<AppState>,
    AppJson(input): AppJson<UpsertPayload>,
) -> AppResult<Json<Environment>> {
    let saved = environment::upsert(
        state.store.as_ref(),
        OwnerId::parse(input.user_id.as_deref()),
        input.id,
        input.name.as_deref(),
        input.variables,
    )
    .await?;
    Ok(Json(saved))
}

/// DELETE /environments/{id}?userId= -- idempotent.
pub async fn delete_environment(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Query(params): Query<OwnerParams>,
) -> AppResult<Json<Value>> {
    environment::delete(state.store.as_ref(), params.owner(), id).await?;
    Ok(Json(json!({ "message": "Environment deleted" })))
}
