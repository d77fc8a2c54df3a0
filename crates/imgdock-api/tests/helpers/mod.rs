//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p imgdock-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use imgdock_api::constants;
use imgdock_api::setup::routes;
use imgdock_api::state::AppState;
use imgdock_core::Config;
use imgdock_storage::{LocalStorage, ObjectStorage};
use std::sync::Arc;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://localhost:4000/files";

/// API path (e.g. `/api/modify`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus the storage it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn ObjectStorage>,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config(temp_dir: &TempDir) -> Config {
    Config::local(temp_dir.path().to_string_lossy().to_string(), BASE_URL)
}

async fn local_storage(temp_dir: &TempDir) -> LocalStorage {
    LocalStorage::new(temp_dir.path().to_path_buf(), BASE_URL.to_string())
        .await
        .expect("Failed to create local storage")
}

fn build(config: Config, storage: Arc<dyn ObjectStorage>, temp_dir: TempDir) -> TestApp {
    let state = Arc::new(AppState::new(config.clone(), storage.clone()));
    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        storage,
        config,
        _temp_dir: temp_dir,
    }
}

/// Setup test app with local storage in a fresh temp dir.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|config| config).await
}

/// Setup test app with a tweaked config.
pub async fn setup_test_app_with(tweak: impl FnOnce(Config) -> Config) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = tweak(test_config(&temp_dir));
    let storage: Arc<dyn ObjectStorage> = Arc::new(local_storage(&temp_dir).await);
    build(config, storage, temp_dir)
}

/// Setup test app whose storage refuses to delete keys containing `locked`.
pub async fn setup_test_app_with_failing_deletes() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(&temp_dir);
    let storage: Arc<dyn ObjectStorage> = Arc::new(storage::FailingDeletes::new(
        local_storage(&temp_dir).await,
        "locked",
    ));
    build(config, storage, temp_dir)
}
