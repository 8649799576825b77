//! Realm registry records: a governance domain and its policy.

use quorum_types::{Address, RealmName, Timestamp, TokenClass};
use serde::{Deserialize, Serialize};

use crate::config::GovernanceConfig;
use crate::error::GovernanceError;

/// How a finished vote is judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteThreshold {
    /// Pass when yes weight is at least `pct`% of all cast weight.
    YesVotePercentage(u8),
    /// Pass when cast weight is at least `pct`% of the token supply and
    /// yes outweighs no.
    QuorumPercentage(u8),
}

impl VoteThreshold {
    pub fn percentage(&self) -> u8 {
        match self {
            Self::YesVotePercentage(pct) | Self::QuorumPercentage(pct) => *pct,
        }
    }

    /// Evaluate final tallies. Integer cross-multiplication only, widened
    /// to `u128` so no product can overflow.
    ///
    /// Zero cast weight never passes.
    pub fn passes(&self, vote_yes: u64, vote_no: u64, total_supply: u64) -> bool {
        let yes = u128::from(vote_yes);
        let total = yes + u128::from(vote_no);
        if total == 0 {
            return false;
        }
        match *self {
            Self::YesVotePercentage(pct) => yes * 100 >= u128::from(pct) * total,
            Self::QuorumPercentage(pct) => {
                total * 100 >= u128::from(pct) * u128::from(total_supply) && vote_yes > vote_no
            }
        }
    }
}

/// Per-realm policy, fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmConfig {
    /// Governance-token balance a proposer must hold.
    pub min_community_weight_to_create_proposal: u64,
    /// Voting window length in seconds.
    pub voting_base_time: u32,
    pub community_vote_threshold: VoteThreshold,
}

impl RealmConfig {
    /// Check this policy against the program-wide limits.
    pub fn validate(&self, limits: &GovernanceConfig) -> Result<(), GovernanceError> {
        if self.voting_base_time < limits.min_voting_time_secs
            || self.voting_base_time > limits.max_voting_time_secs
        {
            return Err(GovernanceError::InvalidConfig(format!(
                "voting_base_time {}s outside {}..={}s",
                self.voting_base_time, limits.min_voting_time_secs, limits.max_voting_time_secs
            )));
        }
        let pct = self.community_vote_threshold.percentage();
        if pct < limits.min_yes_vote_threshold || pct > limits.max_yes_vote_threshold {
            return Err(GovernanceError::InvalidConfig(format!(
                "threshold {pct}% outside {}..={}%",
                limits.min_yes_vote_threshold, limits.max_yes_vote_threshold
            )));
        }
        Ok(())
    }
}

/// A governance domain. Anchors every proposal and vote within it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub name: RealmName,
    pub authority: Address,
    pub governance_token_class: TokenClass,
    pub config: RealmConfig,
    /// Next proposal sequence number. Only ever incremented.
    pub voting_proposal_count: u32,
    pub created_at: Timestamp,
}

impl Realm {
    pub fn new(
        name: RealmName,
        authority: Address,
        governance_token_class: TokenClass,
        config: RealmConfig,
        created_at: Timestamp,
    ) -> Self {
        Self {
            name,
            authority,
            governance_token_class,
            config,
            voting_proposal_count: 0,
            created_at,
        }
    }

    pub fn can_create_proposal(&self, token_amount: u64) -> bool {
        token_amount >= self.config.min_community_weight_to_create_proposal
    }

    /// Hand out the current counter value and advance the counter.
    pub fn allocate_sequence(&mut self) -> Result<u32, GovernanceError> {
        let sequence = self.voting_proposal_count;
        self.voting_proposal_count = sequence
            .checked_add(1)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(sequence)
    }
}
