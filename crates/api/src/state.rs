use std::sync::Arc;

use peyk_push::Dispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: peyk_db::DbPool,
    /// Server configuration (service token, timeouts).
    pub config: Arc<ServerConfig>,
    /// Push dispatcher with VAPID keys loaded at startup.
    pub dispatcher: Arc<Dispatcher>,
}
