//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - URL syntax, denylist and scheme helpers
//! - [`client_ip`] - Caller identity extraction for rate limiting

pub mod client_ip;
pub mod code_generator;
pub mod url_validator;
