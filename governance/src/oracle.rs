//! Collaborator interfaces consumed by the governance core.
//!
//! The token ledger and the clock live outside this crate. The engine only
//! reads from them; it never moves tokens or adjusts time.

use std::sync::Arc;

use quorum_types::{Address, Timestamp, TokenClass};

/// Reports token holdings. Treated as authoritative and read-only.
pub trait TokenWeightOracle: Send + Sync {
    /// The holder's balance of `token_class` at call time.
    fn balance_of(&self, holder: &Address, token_class: &TokenClass) -> u64;

    /// Outstanding supply of `token_class`, used by quorum thresholds.
    fn total_supply(&self, token_class: &TokenClass) -> u64;
}

/// Supplies the monotonic current time used for deadline checks.
pub trait TimeAuthority: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeAuthority for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<T: TokenWeightOracle + ?Sized> TokenWeightOracle for Arc<T> {
    fn balance_of(&self, holder: &Address, token_class: &TokenClass) -> u64 {
        (**self).balance_of(holder, token_class)
    }

    fn total_supply(&self, token_class: &TokenClass) -> u64 {
        (**self).total_supply(token_class)
    }
}

impl<T: TimeAuthority + ?Sized> TimeAuthority for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
