use quorum_store::StoreError;
use quorum_types::{Timestamp, TypesError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("invalid realm config: {0}")]
    InvalidConfig(String),

    #[error("invalid realm name: {0}")]
    InvalidRealmName(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("realm {0} already exists")]
    RealmAlreadyExists(String),

    #[error("realm {0} not found")]
    RealmNotFound(String),

    #[error("proposal {0} not found")]
    ProposalNotFound(String),

    #[error("insufficient tokens to create proposal: have {have}, need {need}")]
    InsufficientTokensToCreateProposal { have: u64, need: u64 },

    #[error("{caller} is not authorized to perform this action")]
    Unauthorized { caller: String },

    #[error("invalid proposal state transition: {action} not allowed in {state}")]
    InvalidProposalState {
        action: &'static str,
        state: &'static str,
    },

    #[error("voting period has not elapsed: deadline {deadline}, now {now}")]
    VotingPeriodNotElapsed { deadline: Timestamp, now: Timestamp },

    #[error("voting period has elapsed: deadline {deadline}, now {now}")]
    VotingPeriodElapsed { deadline: Timestamp, now: Timestamp },

    #[error("{0} has already voted on this proposal")]
    AlreadyVoted(String),

    #[error("{0} holds no governance tokens")]
    NoVotingWeight(String),

    #[error("title too long: {len} > {max} bytes")]
    TitleTooLong { len: usize, max: usize },

    #[error("description too long: {len} > {max} bytes")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("too many instructions: {count} > {max}")]
    TooManyInstructions { count: usize, max: usize },

    #[error("instruction {index} has too many accounts: {count} > {max}")]
    InstructionTooManyAccounts {
        index: usize,
        count: usize,
        max: usize,
    },

    #[error("instruction {index} data too long: {len} > {max} bytes")]
    InstructionDataTooLong { index: usize, len: usize, max: usize },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("record codec error: {0}")]
    Codec(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<TypesError> for GovernanceError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidRealmName { .. } => Self::InvalidRealmName(e.to_string()),
            TypesError::InvalidAddress(raw) => Self::InvalidAddress(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_address_is_not_an_authority_error() {
        let err = GovernanceError::from(TypesError::InvalidAddress("alice".into()));
        assert_eq!(err, GovernanceError::InvalidAddress("alice".into()));
    }

    #[test]
    fn realm_name_error_keeps_its_kind() {
        let err = GovernanceError::from(TypesError::InvalidRealmName { len: 0, max: 50 });
        assert!(matches!(err, GovernanceError::InvalidRealmName(_)));
    }
}
