//! Logical tables of the governance store.

use std::fmt;

/// One keyspace per record kind. Backends map each table to its own
/// database (LMDB) or key namespace (in-memory).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    /// Realm records keyed by realm name.
    Realms,
    /// Proposal records keyed by `(realm, sequence)`.
    Proposals,
    /// Vote receipts keyed by `(proposal, voter)`.
    VoteRecords,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Realms, Table::Proposals, Table::VoteRecords];

    /// Stable name, used as the LMDB database name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Realms => "realms",
            Self::Proposals => "proposals",
            Self::VoteRecords => "vote_records",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
