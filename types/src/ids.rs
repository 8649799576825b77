//! Record identities and their storage key encoding.
//!
//! Keys are byte strings laid out so that related records share a prefix:
//!
//! ```text
//! realm        = name
//! proposal     = len(name):u8 ‖ name ‖ sequence:u32be
//! vote record  = proposal key ‖ voter
//! ```
//!
//! The length prefix keeps realm `"ab"` from colliding with realm `"a"`, and
//! the big-endian sequence makes a prefix scan yield proposals in creation
//! order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;
use crate::error::TypesError;

/// A validated realm name. The name doubles as the realm's storage key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RealmName(String);

impl RealmName {
    /// Hard ceiling imposed by the one-byte length prefix in proposal keys.
    pub const MAX_LEN: usize = u8::MAX as usize;

    /// Validate `raw` against `max_len` (clamped to [`RealmName::MAX_LEN`]).
    pub fn new(raw: impl Into<String>, max_len: usize) -> Result<Self, TypesError> {
        let s = raw.into();
        let max = max_len.min(Self::MAX_LEN);
        if s.is_empty() || s.len() > max {
            return Err(TypesError::InvalidRealmName { len: s.len(), max });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key of the realm record.
    pub fn to_key(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    /// Prefix shared by every proposal key in this realm.
    pub fn proposal_prefix(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + self.0.len() + 4);
        // Length fits: enforced by `new`.
        key.push(self.0.len() as u8);
        key.extend_from_slice(self.0.as_bytes());
        key
    }
}

impl TryFrom<String> for RealmName {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s, Self::MAX_LEN)
    }
}

impl From<RealmName> for String {
    fn from(name: RealmName) -> Self {
        name.0
    }
}

impl fmt::Display for RealmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A proposal's identity: its realm plus the realm counter value at creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId {
    pub realm: RealmName,
    pub sequence: u32,
}

impl ProposalId {
    pub fn new(realm: RealmName, sequence: u32) -> Self {
        Self { realm, sequence }
    }

    pub fn to_key(&self) -> Vec<u8> {
        let mut key = self.realm.proposal_prefix();
        key.extend_from_slice(&self.sequence.to_be_bytes());
        key
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.realm, self.sequence)
    }
}

/// A vote record's identity: at most one record exists per pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteRecordId {
    pub proposal: ProposalId,
    pub voter: Address,
}

impl VoteRecordId {
    pub fn new(proposal: ProposalId, voter: Address) -> Self {
        Self { proposal, voter }
    }

    pub fn to_key(&self) -> Vec<u8> {
        let mut key = self.proposal.to_key();
        key.extend_from_slice(self.voter.as_bytes());
        key
    }
}

impl fmt::Display for VoteRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.proposal, self.voter)
    }
}
