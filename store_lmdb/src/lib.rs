//! LMDB storage backend for the Quorum governance core.
//!
//! Implements [`quorum_store::GovernanceStore`] using the `heed` LMDB
//! bindings. Each [`quorum_store::Table`] maps to one named LMDB database
//! inside a single environment.

pub mod environment;
pub mod error;
pub mod governance;
pub mod write_batch;

pub use environment::{LmdbConfig, LmdbEnvironment};
pub use error::LmdbError;
