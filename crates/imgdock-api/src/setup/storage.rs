//! Storage setup and initialization

use anyhow::Result;
use imgdock_core::Config;
use imgdock_storage::{create_storage, ObjectStorage};
use std::sync::Arc;

/// Build the storage gateway once for the whole process
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    tracing::info!("Initializing storage gateway...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage gateway initialized successfully"
    );
    Ok(storage)
}
