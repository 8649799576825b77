//! Typed access to governance records on top of the byte-level store.
//!
//! Records are `bincode`-encoded. Every helper is generic over the
//! transaction so the same code runs inside read snapshots and write
//! transactions.

use quorum_store::{ReadTxn, StoreError, Table, WriteTxn};
use quorum_types::{ProposalId, RealmName, VoteRecordId};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GovernanceError;
use crate::proposal::Proposal;
use crate::realm::Realm;
use crate::vote::VoteRecord;

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, GovernanceError> {
    bincode::serialize(value).map_err(|e| GovernanceError::Codec(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, GovernanceError> {
    bincode::deserialize(bytes).map_err(|e| GovernanceError::Codec(e.to_string()))
}

fn load<T, R>(txn: &R, table: Table, key: &[u8]) -> Result<Option<T>, GovernanceError>
where
    T: DeserializeOwned,
    R: ReadTxn + ?Sized,
{
    txn.get(table, key)?.map(|bytes| decode(&bytes)).transpose()
}

fn scan<T, R>(txn: &R, table: Table, prefix: &[u8]) -> Result<Vec<T>, GovernanceError>
where
    T: DeserializeOwned,
    R: ReadTxn + ?Sized,
{
    txn.scan_prefix(table, prefix)?
        .into_iter()
        .map(|(_, bytes)| decode(&bytes))
        .collect()
}

// ── Realms ─────────────────────────────────────────────────────────────

pub fn load_realm<R: ReadTxn + ?Sized>(
    txn: &R,
    name: &RealmName,
) -> Result<Option<Realm>, GovernanceError> {
    load(txn, Table::Realms, &name.to_key())
}

pub fn require_realm<R: ReadTxn + ?Sized>(
    txn: &R,
    name: &RealmName,
) -> Result<Realm, GovernanceError> {
    load_realm(txn, name)?.ok_or_else(|| GovernanceError::RealmNotFound(name.to_string()))
}

/// Allocate a new realm record. Fails if the name is taken.
pub fn insert_realm<W: WriteTxn + ?Sized>(
    txn: &mut W,
    realm: &Realm,
) -> Result<(), GovernanceError> {
    match txn.insert_new(Table::Realms, &realm.name.to_key(), &encode(realm)?) {
        Err(StoreError::Duplicate { .. }) => {
            Err(GovernanceError::RealmAlreadyExists(realm.name.to_string()))
        }
        other => Ok(other?),
    }
}

pub fn update_realm<W: WriteTxn + ?Sized>(
    txn: &mut W,
    realm: &Realm,
) -> Result<(), GovernanceError> {
    txn.put(Table::Realms, &realm.name.to_key(), &encode(realm)?)?;
    Ok(())
}

// ── Proposals ──────────────────────────────────────────────────────────

pub fn load_proposal<R: ReadTxn + ?Sized>(
    txn: &R,
    id: &ProposalId,
) -> Result<Option<Proposal>, GovernanceError> {
    load(txn, Table::Proposals, &id.to_key())
}

pub fn require_proposal<R: ReadTxn + ?Sized>(
    txn: &R,
    id: &ProposalId,
) -> Result<Proposal, GovernanceError> {
    load_proposal(txn, id)?.ok_or_else(|| GovernanceError::ProposalNotFound(id.to_string()))
}

/// All proposals of a realm in sequence order.
pub fn list_proposals<R: ReadTxn + ?Sized>(
    txn: &R,
    realm: &RealmName,
) -> Result<Vec<Proposal>, GovernanceError> {
    scan(txn, Table::Proposals, &realm.proposal_prefix())
}

/// Allocate a new proposal record. A taken key means the realm counter
/// and the proposal table disagree.
pub fn insert_proposal<W: WriteTxn + ?Sized>(
    txn: &mut W,
    proposal: &Proposal,
) -> Result<(), GovernanceError> {
    match txn.insert_new(Table::Proposals, &proposal.id.to_key(), &encode(proposal)?) {
        Err(StoreError::Duplicate { .. }) => Err(GovernanceError::Store(StoreError::Corruption(
            format!("proposal {} already allocated", proposal.id),
        ))),
        other => Ok(other?),
    }
}

pub fn update_proposal<W: WriteTxn + ?Sized>(
    txn: &mut W,
    proposal: &Proposal,
) -> Result<(), GovernanceError> {
    txn.put(Table::Proposals, &proposal.id.to_key(), &encode(proposal)?)?;
    Ok(())
}

// ── Vote records ───────────────────────────────────────────────────────

pub fn load_vote_record<R: ReadTxn + ?Sized>(
    txn: &R,
    id: &VoteRecordId,
) -> Result<Option<VoteRecord>, GovernanceError> {
    load(txn, Table::VoteRecords, &id.to_key())
}

pub fn has_voted<R: ReadTxn + ?Sized>(
    txn: &R,
    id: &VoteRecordId,
) -> Result<bool, GovernanceError> {
    Ok(txn.contains(Table::VoteRecords, &id.to_key())?)
}

/// Every receipt for a proposal, ordered by voter key.
pub fn list_vote_records<R: ReadTxn + ?Sized>(
    txn: &R,
    proposal: &ProposalId,
) -> Result<Vec<VoteRecord>, GovernanceError> {
    scan(txn, Table::VoteRecords, &proposal.to_key())
}

/// Allocate a vote receipt. First writer wins.
pub fn insert_vote_record<W: WriteTxn + ?Sized>(
    txn: &mut W,
    record: &VoteRecord,
) -> Result<(), GovernanceError> {
    match txn.insert_new(Table::VoteRecords, &record.id().to_key(), &encode(record)?) {
        Err(StoreError::Duplicate { .. }) => {
            Err(GovernanceError::AlreadyVoted(record.voter.to_string()))
        }
        other => Ok(other?),
    }
}
