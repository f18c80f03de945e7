use axum::routing::post;
use axum::Router;

use crate::handlers::proxy;
use crate::state::AppState;

/// Relay routes, mounted at the root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/proxy", post(proxy::proxy))
        .route("/send", post(proxy::send))
}
