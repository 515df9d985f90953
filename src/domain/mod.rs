//! Domain layer containing business entities and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Short link and quota data structures, key layout
//! - [`repositories`] - Key-value store trait definitions
//!
//! The domain layer has no dependency on infrastructure or HTTP code.
//! Business rules live in [`crate::application::services`].

pub mod entities;
pub mod repositories;
