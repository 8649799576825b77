//! Token-weighted realm governance.
//!
//! A *realm* is a governance domain with its own policy and proposal
//! sequence. Holders of the realm's governance token create proposals,
//! vote on them with their full balance, and anyone may finalize a
//! proposal once its voting window has closed:
//!
//! Draft → Voting → Succeeded | Defeated
//!
//! Key principle: one token = one unit of weight, read from the token
//! ledger at the moment a vote is cast and frozen into a permanent receipt.
//! Proposal execution and vote delegation are not part of this crate.

pub mod config;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod proposal;
pub mod realm;
pub mod records;
pub mod spans;
pub mod vote;

pub use config::GovernanceConfig;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use oracle::{SystemClock, TimeAuthority, TokenWeightOracle};
pub use proposal::{InstructionAccount, Proposal, ProposalInstruction, ProposalState, VotingWindow};
pub use realm::{Realm, RealmConfig, VoteThreshold};
pub use vote::{VoteRecord, VoteType};
