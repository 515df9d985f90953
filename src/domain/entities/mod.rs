//! Core domain entities.
//!
//! Neither entity is a stored struct: a short link is a single
//! `{url:<code> -> long_url}` pair and a quota counter is a single
//! `{quota:<client> -> remaining}` pair, both with a store-side expiry.
//!
//! - [`Link`] / [`NewLink`] - A registered short link and its creation input
//! - [`QuotaStatus`] - Remaining calls and window reset for a client

pub mod link;
pub mod quota;

pub use link::{DEFAULT_EXPIRY_HOURS, Link, MAX_EXPIRY_HOURS, NewLink, expiry_ttl, link_key};
pub use quota::{QuotaStatus, quota_key};
