use axum::extract::{Query, State};
use axum::Json;

use courier_db::models::history::HistoryRecord;

use crate::error::AppResult;
use crate::query::OwnerParams;
use crate::state::AppState;

/// GET /history -- the owner's 20 most recent records, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> AppResult<Json<Vec<HistoryRecord>>> {
    let owner = params.owner();
    let records = courier_history::list_recent(state.store.as_ref(), owner.as_ref()).await?;
    tracing::debug!(count = records.len(), "Listed history");
    Ok(Json(records))
}
