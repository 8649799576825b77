//! Deterministic stand-ins for the governance engine's collaborators.
//!
//! The engine reaches its clock, token ledger and store only through traits.
//! The types here implement those traits in memory and expose setters that
//! tests drive directly. All of them are `Send + Sync`, so concurrency tests
//! can share one engine across threads.

pub mod clock;
pub mod ledger;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullTokenLedger;
pub use store::NullStore;
