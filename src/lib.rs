//! # Tiny Shortener
//!
//! A rate-limited URL shortening endpoint built with Axum over a key-value store.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link and quota entities, store traits
//! - **Application Layer** ([`application`]) - Registration and rate limiting
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random or caller-chosen short codes with per-link expiry
//! - Per-client quota over a sliding 30 minute window
//! - Domain denylist and `https://` enforcement
//! - Falls back to an in-memory store when Redis is not configured
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional
//! export DOMAIN="sho.rt"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{RateLimiter, ShortenerService, ShortenerSettings};
    pub use crate::domain::entities::{Link, NewLink, QuotaStatus};
    pub use crate::domain::repositories::{KeyValueStore, StoreConnector};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{MemoryStore, RedisConnector};
    pub use crate::state::AppState;
}
