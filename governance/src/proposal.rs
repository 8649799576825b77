//! Governance proposals and their lifecycle.
//!
//! ```text
//! Draft ──start_voting──▶ Voting ──finalize──▶ Succeeded
//!                                     └──────▶ Defeated
//! ```
//!
//! Transitions only move forward. Both terminal states are immutable.

use quorum_types::{Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::realm::VoteThreshold;
use crate::vote::VoteType;

/// An account reference carried by a deferred instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionAccount {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A deferred action a passed proposal authorizes. Opaque to this crate;
/// nothing here executes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalInstruction {
    pub program_id: Address,
    pub accounts: Vec<InstructionAccount>,
    pub data: Vec<u8>,
}

/// When voting opened and when it closes. Fixed once set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingWindow {
    pub voting_at: Timestamp,
    pub voting_deadline: Timestamp,
}

impl VotingWindow {
    /// Open a window at `now` lasting `base_time` seconds.
    pub fn open(now: Timestamp, base_time: u32) -> Result<Self, GovernanceError> {
        let voting_deadline = now
            .checked_add_secs(u64::from(base_time))
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(Self {
            voting_at: now,
            voting_deadline,
        })
    }

    /// The deadline itself is already closed.
    pub fn is_closed(&self, now: Timestamp) -> bool {
        self.voting_deadline.has_passed(now)
    }
}

/// Lifecycle state. Timestamps live in the variants that own them, so a
/// `Draft` proposal cannot carry a voting window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    Draft,
    Voting {
        window: VotingWindow,
    },
    Succeeded {
        window: VotingWindow,
        voting_completed_at: Timestamp,
    },
    Defeated {
        window: VotingWindow,
        voting_completed_at: Timestamp,
    },
}

impl ProposalState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Voting { .. } => "Voting",
            Self::Succeeded { .. } => "Succeeded",
            Self::Defeated { .. } => "Defeated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Draft | Self::Voting { .. } => false,
            Self::Succeeded { .. } | Self::Defeated { .. } => true,
        }
    }

    pub fn window(&self) -> Option<&VotingWindow> {
        match self {
            Self::Draft => None,
            Self::Voting { window }
            | Self::Succeeded { window, .. }
            | Self::Defeated { window, .. } => Some(window),
        }
    }
}

/// A single governance decision within a realm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub title: String,
    pub description: String,
    pub instructions: Vec<ProposalInstruction>,
    pub state: ProposalState,
    pub vote_yes: u64,
    pub vote_no: u64,
    pub created_at: Timestamp,
}

impl Proposal {
    pub fn new(
        id: ProposalId,
        proposer: Address,
        title: String,
        description: String,
        instructions: Vec<ProposalInstruction>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proposer,
            title,
            description,
            instructions,
            state: ProposalState::Draft,
            vote_yes: 0,
            vote_no: 0,
            created_at,
        }
    }

    pub fn voting_deadline(&self) -> Option<Timestamp> {
        self.state.window().map(|w| w.voting_deadline)
    }

    fn wrong_state(&self, action: &'static str) -> GovernanceError {
        GovernanceError::InvalidProposalState {
            action,
            state: self.state.name(),
        }
    }

    /// `Draft → Voting`. Only the proposer may open voting.
    pub fn start_voting(
        &mut self,
        caller: &Address,
        now: Timestamp,
        base_time: u32,
    ) -> Result<VotingWindow, GovernanceError> {
        if caller != &self.proposer {
            return Err(GovernanceError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        match self.state {
            ProposalState::Draft => {}
            ProposalState::Voting { .. }
            | ProposalState::Succeeded { .. }
            | ProposalState::Defeated { .. } => return Err(self.wrong_state("start_voting")),
        }
        let window = VotingWindow::open(now, base_time)?;
        self.state = ProposalState::Voting { window };
        Ok(window)
    }

    /// The open window, if votes may still be cast at `now`.
    pub fn ensure_open_for_votes(&self, now: Timestamp) -> Result<VotingWindow, GovernanceError> {
        match &self.state {
            ProposalState::Voting { window } => {
                if window.is_closed(now) {
                    Err(GovernanceError::VotingPeriodElapsed {
                        deadline: window.voting_deadline,
                        now,
                    })
                } else {
                    Ok(*window)
                }
            }
            ProposalState::Draft
            | ProposalState::Succeeded { .. }
            | ProposalState::Defeated { .. } => Err(self.wrong_state("cast_vote")),
        }
    }

    /// Add `weight` to the tally for `vote_type`. Nothing changes on error.
    pub fn record_vote(
        &mut self,
        vote_type: VoteType,
        weight: u64,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.ensure_open_for_votes(now)?;
        let tally = match vote_type {
            VoteType::Yes => &mut self.vote_yes,
            VoteType::No => &mut self.vote_no,
        };
        *tally = tally
            .checked_add(weight)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(())
    }

    /// `Voting → Succeeded | Defeated` once the deadline has passed.
    ///
    /// `total_supply` is consulted only by quorum thresholds.
    pub fn finalize(
        &mut self,
        now: Timestamp,
        threshold: &VoteThreshold,
        total_supply: impl FnOnce() -> u64,
    ) -> Result<bool, GovernanceError> {
        let window = match &self.state {
            ProposalState::Voting { window } => *window,
            ProposalState::Draft
            | ProposalState::Succeeded { .. }
            | ProposalState::Defeated { .. } => return Err(self.wrong_state("finalize")),
        };
        if !window.is_closed(now) {
            return Err(GovernanceError::VotingPeriodNotElapsed {
                deadline: window.voting_deadline,
                now,
            });
        }
        let supply = match threshold {
            VoteThreshold::QuorumPercentage(_) => total_supply(),
            VoteThreshold::YesVotePercentage(_) => 0,
        };
        let passed = threshold.passes(self.vote_yes, self.vote_no, supply);
        self.state = if passed {
            ProposalState::Succeeded {
                window,
                voting_completed_at: now,
            }
        } else {
            ProposalState::Defeated {
                window,
                voting_completed_at: now,
            }
        };
        Ok(passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_types::RealmName;

    const THRESHOLD: VoteThreshold = VoteThreshold::YesVotePercentage(60);

    fn proposer() -> Address {
        Address::new("qrm_proposer")
    }

    fn draft() -> Proposal {
        Proposal::new(
            ProposalId::new(RealmName::new("dao", 50).unwrap(), 0),
            proposer(),
            "Raise fees".into(),
            "Raise the base fee".into(),
            Vec::new(),
            Timestamp::new(1_000),
        )
    }

    fn voting(at: u64) -> Proposal {
        let mut p = draft();
        p.start_voting(&proposer(), Timestamp::new(at), 7_200).unwrap();
        p
    }

    #[test]
    fn new_proposal_is_draft_with_zero_tallies() {
        let p = draft();
        assert_eq!(p.state, ProposalState::Draft);
        assert_eq!((p.vote_yes, p.vote_no), (0, 0));
        assert_eq!(p.voting_deadline(), None);
    }

    #[test]
    fn start_voting_sets_deadline_once() {
        let p = voting(5_000);
        assert_eq!(p.state.name(), "Voting");
        assert_eq!(p.voting_deadline(), Some(Timestamp::new(12_200)));
    }

    #[test]
    fn start_voting_rejects_non_proposer_before_state() {
        let mut p = voting(5_000);
        let err = p
            .start_voting(&Address::new("qrm_mallory"), Timestamp::new(6_000), 7_200)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Unauthorized { .. }));
    }

    #[test]
    fn start_voting_twice_is_invalid_state() {
        let mut p = voting(5_000);
        let err = p
            .start_voting(&proposer(), Timestamp::new(6_000), 7_200)
            .unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InvalidProposalState {
                action: "start_voting",
                state: "Voting"
            }
        );
        assert_eq!(p.voting_deadline(), Some(Timestamp::new(12_200)));
    }

    #[test]
    fn start_voting_deadline_overflow() {
        let mut p = draft();
        let err = p
            .start_voting(&proposer(), Timestamp::new(u64::MAX - 10), 7_200)
            .unwrap_err();
        assert_eq!(err, GovernanceError::ArithmeticOverflow);
        assert_eq!(p.state, ProposalState::Draft);
    }

    #[test]
    fn votes_rejected_in_draft_and_after_deadline() {
        let mut p = draft();
        assert!(matches!(
            p.record_vote(VoteType::Yes, 10, Timestamp::new(1_000)),
            Err(GovernanceError::InvalidProposalState { .. })
        ));

        let mut p = voting(0);
        assert!(p.record_vote(VoteType::Yes, 10, Timestamp::new(7_199)).is_ok());
        assert!(matches!(
            p.record_vote(VoteType::No, 10, Timestamp::new(7_200)),
            Err(GovernanceError::VotingPeriodElapsed { .. })
        ));
        assert_eq!((p.vote_yes, p.vote_no), (10, 0));
    }

    #[test]
    fn tally_overflow_leaves_tally_unchanged() {
        let mut p = voting(0);
        p.record_vote(VoteType::No, u64::MAX, Timestamp::new(1)).unwrap();
        assert_eq!(
            p.record_vote(VoteType::No, 1, Timestamp::new(2)),
            Err(GovernanceError::ArithmeticOverflow)
        );
        assert_eq!(p.vote_no, u64::MAX);
    }

    #[test]
    fn finalize_before_deadline_fails() {
        let mut p = voting(0);
        let err = p.finalize(Timestamp::new(7_199), &THRESHOLD, || 0).unwrap_err();
        assert!(matches!(err, GovernanceError::VotingPeriodNotElapsed { .. }));
        assert_eq!(p.state.name(), "Voting");
    }

    #[test]
    fn finalize_decides_and_is_not_reentrant() {
        let mut p = voting(0);
        p.record_vote(VoteType::Yes, 60, Timestamp::new(1)).unwrap();
        p.record_vote(VoteType::No, 40, Timestamp::new(2)).unwrap();
        assert!(p.finalize(Timestamp::new(7_200), &THRESHOLD, || 0).unwrap());
        assert!(matches!(p.state, ProposalState::Succeeded { .. }));
        assert!(p.state.is_terminal());

        let err = p.finalize(Timestamp::new(9_000), &THRESHOLD, || 0).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::InvalidProposalState {
                action: "finalize",
                state: "Succeeded"
            }
        );
    }

    #[test]
    fn finalize_with_no_votes_is_defeated() {
        let mut p = voting(0);
        assert!(!p.finalize(Timestamp::new(7_200), &THRESHOLD, || 0).unwrap());
        match p.state {
            ProposalState::Defeated {
                window,
                voting_completed_at,
            } => {
                assert_eq!(window.voting_deadline, Timestamp::new(7_200));
                assert_eq!(voting_completed_at, Timestamp::new(7_200));
            }
            other => panic!("expected Defeated, got {other:?}"),
        }
    }

    #[test]
    fn supply_is_only_read_for_quorum_thresholds() {
        let mut p = voting(0);
        p.record_vote(VoteType::Yes, 1, Timestamp::new(1)).unwrap();
        let passed = p
            .finalize(Timestamp::new(7_200), &THRESHOLD, || {
                panic!("supply must not be read")
            })
            .unwrap();
        assert!(passed);

        let mut q = voting(0);
        q.record_vote(VoteType::Yes, 10, Timestamp::new(1)).unwrap();
        let passed = q
            .finalize(Timestamp::new(7_200), &VoteThreshold::QuorumPercentage(50), || 100)
            .unwrap();
        assert!(!passed);
    }

    #[test]
    fn draft_cannot_be_finalized() {
        let mut p = draft();
        assert!(matches!(
            p.finalize(Timestamp::new(u64::MAX), &THRESHOLD, || 0),
            Err(GovernanceError::InvalidProposalState { .. })
        ));
    }
}
