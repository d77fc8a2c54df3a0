//! Application state shared by all handlers.

use imgdock_core::Config;
use imgdock_storage::ObjectStorage;
use std::sync::Arc;

/// Read-only per-process state
///
/// Requests share nothing mutable: the storage gateway is built once at
/// startup and every handler borrows it through `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn ObjectStorage>) -> Self {
        AppState { config, storage }
    }
}
