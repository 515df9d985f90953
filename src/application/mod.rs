//! Application layer services implementing business logic.
//!
//! Services consume the store traits from [`crate::domain::repositories`]
//! and expose a small API to HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Short link registration
//! - [`services::rate_limiter::RateLimiter`] - Per-client quota accounting

pub mod services;
