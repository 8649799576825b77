//! Core governance engine: the five request handlers plus read queries.
//!
//! Each request runs inside one store write transaction: records are
//! loaded, guards are checked, state is mutated and written back, and the
//! transaction commits only if every step succeeded. Because the store
//! serializes write transactions, the realm counter bump and the tally
//! read-modify-write can never interleave with another request.

use quorum_store::GovernanceStore;
use quorum_types::{Address, ProposalId, RealmName, TokenClass, VoteRecordId};
use quorum_utils::format_duration;

use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::oracle::{TimeAuthority, TokenWeightOracle};
use crate::proposal::{Proposal, ProposalInstruction};
use crate::realm::{Realm, RealmConfig};
use crate::records;
use crate::spans::{proposal_span, realm_span};
use crate::vote::{VoteRecord, VoteType};

/// The governance state machine bound to a store and its collaborators.
///
/// `Send + Sync` whenever its parts are, so one engine can serve many
/// threads.
pub struct GovernanceEngine<S, O, C> {
    store: S,
    oracle: O,
    clock: C,
    config: GovernanceConfig,
}

impl<S, O, C> GovernanceEngine<S, O, C>
where
    S: GovernanceStore,
    O: TokenWeightOracle,
    C: TimeAuthority,
{
    pub fn new(store: S, oracle: O, clock: C, config: GovernanceConfig) -> Self {
        Self {
            store,
            oracle,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Realm registry ─────────────────────────────────────────────────

    /// Register a realm administered by `authority`.
    pub fn create_realm(
        &self,
        authority: &Address,
        name: &str,
        config: RealmConfig,
        governance_token_class: TokenClass,
    ) -> Result<Realm, GovernanceError> {
        let name = RealmName::new(name, self.config.max_realm_name_len)?;
        let _span = realm_span("create_realm", &name, authority).entered();

        config.validate(&self.config).inspect_err(log_rejection)?;

        let result: Result<Realm, GovernanceError> = self.store.write(|txn| {
            let realm = Realm::new(
                name.clone(),
                authority.clone(),
                governance_token_class,
                config,
                self.clock.now(),
            );
            records::insert_realm(txn, &realm)?;
            Ok(realm)
        });

        if let Ok(realm) = &result {
            tracing::info!(
                token_class = %realm.governance_token_class,
                min_weight = realm.config.min_community_weight_to_create_proposal,
                voting_time = %format_duration(u64::from(realm.config.voting_base_time)),
                "realm created"
            );
        }
        result.inspect_err(log_rejection)
    }

    // ── Proposal state machine ─────────────────────────────────────────

    /// Create a `Draft` proposal at the realm's next sequence number.
    pub fn create_proposal(
        &self,
        proposer: &Address,
        realm: &RealmName,
        title: String,
        description: String,
        instructions: Vec<ProposalInstruction>,
    ) -> Result<Proposal, GovernanceError> {
        let _span = realm_span("create_proposal", realm, proposer).entered();

        let result: Result<Proposal, GovernanceError> = self.store.write(|txn| {
            let mut realm = records::require_realm(txn, realm)?;
            self.check_proposal_bounds(&title, &description, &instructions)?;

            let balance = self
                .oracle
                .balance_of(proposer, &realm.governance_token_class);
            if !realm.can_create_proposal(balance) {
                return Err(GovernanceError::InsufficientTokensToCreateProposal {
                    have: balance,
                    need: realm.config.min_community_weight_to_create_proposal,
                });
            }

            let sequence = realm.allocate_sequence()?;
            let proposal = Proposal::new(
                ProposalId::new(realm.name.clone(), sequence),
                proposer.clone(),
                title,
                description,
                instructions,
                self.clock.now(),
            );
            records::insert_proposal(txn, &proposal)?;
            records::update_realm(txn, &realm)?;
            Ok(proposal)
        });

        if let Ok(proposal) = &result {
            tracing::info!(proposal = %proposal.id, "proposal created");
        }
        result.inspect_err(log_rejection)
    }

    /// Open voting on a `Draft` proposal. Proposer only.
    pub fn start_voting(
        &self,
        caller: &Address,
        proposal_id: &ProposalId,
    ) -> Result<Proposal, GovernanceError> {
        let _span = proposal_span("start_voting", proposal_id, caller).entered();

        let result: Result<Proposal, GovernanceError> = self.store.write(|txn| {
            let mut proposal = records::require_proposal(txn, proposal_id)?;
            let realm = records::require_realm(txn, &proposal_id.realm)?;
            let window =
                proposal.start_voting(caller, self.clock.now(), realm.config.voting_base_time)?;
            records::update_proposal(txn, &proposal)?;
            tracing::info!(
                voting_at = %window.voting_at,
                voting_deadline = %window.voting_deadline,
                "voting started"
            );
            Ok(proposal)
        });
        result.inspect_err(log_rejection)
    }

    /// Close a proposal whose voting deadline has passed. Any caller.
    pub fn finalize(
        &self,
        caller: &Address,
        proposal_id: &ProposalId,
    ) -> Result<Proposal, GovernanceError> {
        let _span = proposal_span("finalize", proposal_id, caller).entered();

        let result: Result<Proposal, GovernanceError> = self.store.write(|txn| {
            let mut proposal = records::require_proposal(txn, proposal_id)?;
            let realm = records::require_realm(txn, &proposal_id.realm)?;
            let passed = proposal.finalize(
                self.clock.now(),
                &realm.config.community_vote_threshold,
                || self.oracle.total_supply(&realm.governance_token_class),
            )?;
            records::update_proposal(txn, &proposal)?;
            tracing::info!(
                vote_yes = proposal.vote_yes,
                vote_no = proposal.vote_no,
                passed,
                "proposal finalized"
            );
            Ok(proposal)
        });
        result.inspect_err(log_rejection)
    }

    // ── Vote ledger ────────────────────────────────────────────────────

    /// Cast `voter`'s full current balance for `vote_type`.
    ///
    /// A zero balance is rejected with `NoVotingWeight` and leaves no
    /// receipt, so the voter may still vote after acquiring tokens.
    pub fn cast_vote(
        &self,
        voter: &Address,
        proposal_id: &ProposalId,
        vote_type: VoteType,
    ) -> Result<VoteRecord, GovernanceError> {
        let _span = proposal_span("cast_vote", proposal_id, voter).entered();

        let result: Result<VoteRecord, GovernanceError> = self.store.write(|txn| {
            let mut proposal = records::require_proposal(txn, proposal_id)?;
            let realm = records::require_realm(txn, &proposal_id.realm)?;
            let now = self.clock.now();
            proposal.ensure_open_for_votes(now)?;

            let record_id = VoteRecordId::new(proposal_id.clone(), voter.clone());
            if records::has_voted(txn, &record_id)? {
                return Err(GovernanceError::AlreadyVoted(voter.to_string()));
            }

            let vote_weight = self.oracle.balance_of(voter, &realm.governance_token_class);
            if vote_weight == 0 {
                return Err(GovernanceError::NoVotingWeight(voter.to_string()));
            }

            proposal.record_vote(vote_type, vote_weight, now)?;
            let record = VoteRecord {
                proposal: proposal_id.clone(),
                voter: voter.clone(),
                vote_type,
                vote_weight,
                voted_at: now,
            };
            records::insert_vote_record(txn, &record)?;
            records::update_proposal(txn, &proposal)?;
            Ok(record)
        });

        if let Ok(record) = &result {
            tracing::info!(
                vote = ?record.vote_type,
                weight = record.vote_weight,
                "vote cast"
            );
        }
        result.inspect_err(log_rejection)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn realm(&self, name: &RealmName) -> Result<Option<Realm>, GovernanceError> {
        self.store.read(|txn| records::load_realm(txn, name))
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<Option<Proposal>, GovernanceError> {
        self.store.read(|txn| records::load_proposal(txn, id))
    }

    pub fn vote_record(&self, id: &VoteRecordId) -> Result<Option<VoteRecord>, GovernanceError> {
        self.store.read(|txn| records::load_vote_record(txn, id))
    }

    /// A realm's proposals in creation order.
    pub fn proposals(&self, realm: &RealmName) -> Result<Vec<Proposal>, GovernanceError> {
        self.store.read(|txn| records::list_proposals(txn, realm))
    }

    /// Every vote receipt for a proposal.
    pub fn vote_records(&self, proposal: &ProposalId) -> Result<Vec<VoteRecord>, GovernanceError> {
        self.store.read(|txn| records::list_vote_records(txn, proposal))
    }

    fn check_proposal_bounds(
        &self,
        title: &str,
        description: &str,
        instructions: &[ProposalInstruction],
    ) -> Result<(), GovernanceError> {
        if title.len() > self.config.max_title_len {
            return Err(GovernanceError::TitleTooLong {
                len: title.len(),
                max: self.config.max_title_len,
            });
        }
        if description.len() > self.config.max_description_len {
            return Err(GovernanceError::DescriptionTooLong {
                len: description.len(),
                max: self.config.max_description_len,
            });
        }
        if instructions.len() > self.config.max_instructions {
            return Err(GovernanceError::TooManyInstructions {
                count: instructions.len(),
                max: self.config.max_instructions,
            });
        }
        for (index, instruction) in instructions.iter().enumerate() {
            if instruction.accounts.len() > self.config.max_instruction_accounts {
                return Err(GovernanceError::InstructionTooManyAccounts {
                    index,
                    count: instruction.accounts.len(),
                    max: self.config.max_instruction_accounts,
                });
            }
            if instruction.data.len() > self.config.max_instruction_data_len {
                return Err(GovernanceError::InstructionDataTooLong {
                    index,
                    len: instruction.data.len(),
                    max: self.config.max_instruction_data_len,
                });
            }
        }
        Ok(())
    }
}

fn log_rejection(error: &GovernanceError) {
    match error {
        GovernanceError::Store(_) | GovernanceError::Codec(_) => {
            tracing::warn!(%error, "request failed")
        }
        _ => tracing::debug!(%error, "request rejected"),
    }
}
