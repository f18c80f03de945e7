pub mod collections;
pub mod environments;
pub mod health;
pub mod history;
pub mod proxy;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// ```text
/// POST   /proxy                       relay a parsed request
/// POST   /send                        interpolate and relay a draft
///
/// GET    /environments                list (?userId=)
/// POST   /environments                upsert
/// DELETE /environments/{id}           delete (?userId=)
///
/// GET    /history                     newest 20 (?userId=)
///
/// GET    /collections                 list with items (?userId=)
/// POST   /collections                 create
/// POST   /collections/{id}/items      save a request
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(proxy::router())
        .nest("/environments", environments::router())
        .nest("/history", history::router())
        .nest("/collections", collections::router())
}
