use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Holds configuration only; runs share nothing in-process.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}
