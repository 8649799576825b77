//! Vote ledger records.

use quorum_types::{Address, ProposalId, Timestamp, VoteRecordId};
use serde::{Deserialize, Serialize};

/// A voter's choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteType {
    Yes,
    No,
}

/// Permanent receipt of one cast vote. Never mutated or deleted; its
/// existence is what blocks a second vote by the same voter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub proposal: ProposalId,
    pub voter: Address,
    pub vote_type: VoteType,
    /// Voter's balance when the vote was cast.
    pub vote_weight: u64,
    pub voted_at: Timestamp,
}

impl VoteRecord {
    pub fn id(&self) -> VoteRecordId {
        VoteRecordId::new(self.proposal.clone(), self.voter.clone())
    }
}
