use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::environments;
use crate::state::AppState;

/// Environment routes, mounted at `/environments`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(environments::list_environments).post(environments::upsert_environment),
        )
        .route("/{id}", delete(environments::delete_environment))
}
