use axum::routing::{get, post};
use axum::Router;

use crate::handlers::collections;
use crate::state::AppState;

/// Collection routes, mounted at `/collections`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route("/{id}/items", post(collections::save_collection_item))
}
