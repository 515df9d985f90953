//! Store trait definitions for the domain layer.
//!
//! The registration core only talks to the traits declared here. Concrete
//! backends live in `crate::infrastructure::store`, and mock
//! implementations are generated via `mockall` for unit tests.

pub mod key_value_store;

pub use key_value_store::{KeyValueStore, StoreConnector, StoreError, StoreResult};

#[cfg(test)]
pub use key_value_store::{MockKeyValueStore, MockStoreConnector};
