#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_shortener::application::services::{ShortenerService, ShortenerSettings};
use tiny_shortener::domain::repositories::{
    KeyValueStore, StoreConnector, StoreError, StoreResult,
};
use tiny_shortener::infrastructure::store::MemoryStore;
use tiny_shortener::routes::app_router;
use tiny_shortener::state::AppState;

pub const TEST_DOMAIN: &str = "sho.rt";

pub fn test_settings(quota: i64) -> ShortenerSettings {
    ShortenerSettings {
        quota,
        public_domain: TEST_DOMAIN.to_string(),
        forbidden_domains: vec![TEST_DOMAIN.to_string(), "blocked.example".to_string()],
    }
}

/// Builds state over a fresh in-memory store and returns the store for inspection.
pub fn create_test_state(quota: i64) -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let shortener = ShortenerService::new(Arc::new(store.clone()), test_settings(quota));
    (AppState::new(Arc::new(shortener), false), store)
}

pub fn create_state_with(connector: Arc<dyn StoreConnector>, behind_proxy: bool) -> AppState {
    let shortener = ShortenerService::new(connector, test_settings(100));
    AppState::new(Arc::new(shortener), behind_proxy)
}

/// Serves the production router as if every request came from `peer`.
///
/// `app_router` is mounted as a fallback service so path normalization still
/// runs before routing, with the mock peer address layered outside it.
pub fn server_from(state: AppState, peer: &str) -> TestServer {
    let addr: SocketAddr = peer.parse().unwrap();
    let app = Router::new()
        .fallback_service(app_router(state))
        .layer(MockConnectInfo(addr));
    TestServer::new(app).unwrap()
}

/// Connector whose store is unreachable.
pub struct UnreachableStore;

#[async_trait]
impl StoreConnector for UnreachableStore {
    async fn acquire(&self) -> StoreResult<Box<dyn KeyValueStore>> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
