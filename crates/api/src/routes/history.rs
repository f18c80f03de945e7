use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// History routes, mounted at `/history`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(history::list_history))
}
