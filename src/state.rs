//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ShortenerService;

/// State shared by all request handlers.
///
/// Holds no mutable data; all shared state lives in the key-value store.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    /// When true, the caller identity comes from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService>, behind_proxy: bool) -> Self {
        Self {
            shortener,
            behind_proxy,
        }
    }
}
