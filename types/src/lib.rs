//! Fundamental types for the Quorum governance core.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: caller addresses, token classes, timestamps and the composite
//! identities under which realms, proposals and vote records are stored.

pub mod address;
pub mod error;
pub mod ids;
pub mod time;

pub use address::{Address, TokenClass};
pub use error::TypesError;
pub use ids::{ProposalId, RealmName, VoteRecordId};
pub use time::Timestamp;
