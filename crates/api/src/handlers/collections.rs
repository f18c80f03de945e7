//! Handlers for collections and saved requests.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use courier_core::types::{EntityId, OwnerId};
use courier_db::models::collection::{Collection, CollectionItem, CollectionWithItems};

use crate::engine::collections::{self, ItemDraft};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::query::OwnerParams;
use crate::state::AppState;

/// Body of `POST /collections`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionPayload {
    pub name: Option<String>,
    pub user_id: Option<String>,
}

/// Body of `POST /collections/{id}/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveItemPayload {
    #[serde(flatten)]
    pub item: ItemDraft,
    pub user_id: Option<String>,
}

/// GET /collections -- each with its items, empty without `userId`.
pub async fn list_collections(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> AppResult<Json<Vec<CollectionWithItems>>> {
    let owner = params.owner();
    let items = collections::list(state.store.as_ref(), owner.as_ref()).await?;
    tracing::debug!(count = items.len(), "Listed collections");
    Ok(Json(items))
}

/// POST /collections
pub async fn create_collection(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCollectionPayload>,
) -> AppResult<(StatusCode, Json<Collection>)> {
    let created = collections::create(
        state.store.as_ref(),
        OwnerId::parse(input.user_id.as_deref()),
        input.name.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /collections/{id}/items -- stores the request text unresolved.
pub async fn save_collection_item(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    AppJson(input): AppJson<SaveItemPayload>,
) -> AppResult<(StatusCode, Json<CollectionItem>)> {
    let item = collections::save_item(
        state.store.as_ref(),
        Some(id),
        OwnerId::parse(input.user_id.as_deref()),
        &input.item,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(item)))
}
