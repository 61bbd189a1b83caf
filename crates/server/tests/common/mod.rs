//! Common test utilities for API testing with a mock fetcher.
//!
//! Builds the full server stack in-process over a temp-dir database, with
//! the remote catalogs replaced by [`MockCatalogFetcher`], and drives it
//! through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use brewdex_core::{
    testing::MockCatalogFetcher, CatalogFetcher, ChangeHub, Config, PackageStore, SearchEngine,
    SqliteStore, SyncManager, UserDataStore,
};
use brewdex_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use brewdex_core::testing::fixtures;

/// In-process server fixture with a scriptable remote catalog.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock fetcher - configure remote payloads and failures
    pub fetcher: Arc<MockCatalogFetcher>,
    /// Change hub shared with the server
    pub hub: ChangeHub,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture over an empty database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let mut config = Config::default();
        config.database.path = db_path.clone();

        let store: Arc<dyn PackageStore> =
            Arc::new(SqliteStore::new(&db_path).expect("Failed to create store"));
        let hub = ChangeHub::default();
        let fetcher = Arc::new(MockCatalogFetcher::new());

        let sync_manager = Arc::new(SyncManager::new(
            config.sync.clone(),
            Arc::clone(&store),
            Arc::clone(&fetcher) as Arc<dyn CatalogFetcher>,
            hub.clone(),
        ));
        let userdata = Arc::new(
            UserDataStore::load(Arc::clone(&store), hub.clone())
                .expect("Failed to load user metadata"),
        );
        let engine = SearchEngine::new(Arc::clone(&store), Arc::clone(&userdata));

        let state = Arc::new(AppState::new(
            config,
            store,
            sync_manager,
            engine,
            userdata,
            hub.clone(),
        ));

        Self {
            router: create_router(state),
            fetcher,
            hub,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a DELETE request with JSON body.
    pub async fn delete_with_body(&self, path: &str, body: Value) -> TestResponse {
        self.request("DELETE", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }
}
