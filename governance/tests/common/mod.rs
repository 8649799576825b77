//! Shared fixtures for governance integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use quorum_governance::{
    GovernanceConfig, GovernanceEngine, Proposal, Realm, RealmConfig, VoteThreshold,
};
use quorum_nullables::{NullClock, NullStore, NullTokenLedger};
use quorum_store::GovernanceStore;
use quorum_types::{Address, TokenClass};

pub const START: u64 = 1_700_000_000;
pub const VOTING_TIME: u32 = 7_200;

pub type TestEngine<S = NullStore> = GovernanceEngine<S, Arc<NullTokenLedger>, Arc<NullClock>>;

pub fn gov_token() -> TokenClass {
    TokenClass::new("gov")
}

pub fn addr(name: &str) -> Address {
    Address::new(format!("qrm_{name}"))
}

/// Min proposer weight 1000, 7200s voting window, 60% yes threshold.
pub fn standard_config() -> RealmConfig {
    RealmConfig {
        min_community_weight_to_create_proposal: 1_000,
        voting_base_time: VOTING_TIME,
        community_vote_threshold: VoteThreshold::YesVotePercentage(60),
    }
}

pub struct Harness<S = NullStore> {
    pub engine: TestEngine<S>,
    pub ledger: Arc<NullTokenLedger>,
    pub clock: Arc<NullClock>,
}

impl Harness<NullStore> {
    pub fn new() -> Self {
        Self::with_store(NullStore::new())
    }
}

impl<S: GovernanceStore> Harness<S> {
    pub fn with_store(store: S) -> Self {
        let ledger = Arc::new(NullTokenLedger::new());
        let clock = Arc::new(NullClock::new(START));
        let engine = GovernanceEngine::new(
            store,
            Arc::clone(&ledger),
            Arc::clone(&clock),
            GovernanceConfig::default(),
        );
        Self {
            engine,
            ledger,
            clock,
        }
    }

    pub fn fund(&self, who: &Address, amount: u64) {
        self.ledger.set_balance(who, &gov_token(), amount);
    }

    pub fn realm(&self, name: &str, config: RealmConfig) -> Realm {
        self.engine
            .create_realm(&addr("authority"), name, config, gov_token())
            .unwrap()
    }

    pub fn draft(&self, realm: &Realm, proposer: &Address) -> Proposal {
        self.engine
            .create_proposal(
                proposer,
                &realm.name,
                "Fund the treasury".to_string(),
                "Move 10k tokens to the community treasury".to_string(),
                Vec::new(),
            )
            .unwrap()
    }

    /// A proposal in `Voting`, opened at the current clock time.
    pub fn voting(&self, realm: &Realm, proposer: &Address) -> Proposal {
        let draft = self.draft(realm, proposer);
        self.engine.start_voting(proposer, &draft.id).unwrap()
    }
}
