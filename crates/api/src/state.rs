use std::sync::Arc;

use courier_db::Store;

use crate::config::ServerConfig;
use crate::engine::pipeline::RelayPipeline;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Environment, collection and history persistence.
    pub store: Arc<dyn Store>,
    /// Interpolate, normalize, dispatch and record.
    pub pipeline: Arc<RelayPipeline>,
}
