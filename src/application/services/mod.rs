//! Business logic services for the application layer.

pub mod rate_limiter;
pub mod shortener_service;

pub use rate_limiter::{DEFAULT_QUOTA, RATE_LIMIT_WINDOW, RateLimiter};
pub use shortener_service::{ShortenerService, ShortenerSettings};
