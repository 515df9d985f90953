//! Infrastructure layer for external integrations.
//!
//! Implements the store contracts defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Redis and in-memory key-value store backends

pub mod store;
