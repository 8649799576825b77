//! Multi-threaded tests: every request is linearizable on both backends.

mod common;

use std::collections::BTreeSet;
use std::thread;

use common::{addr, gov_token, standard_config, Harness};
use quorum_governance::{GovernanceError, VoteType};
use quorum_store::GovernanceStore;
use quorum_store_lmdb::LmdbEnvironment;

const THREADS: u64 = 16;

fn lmdb_harness() -> (tempfile::TempDir, Harness<LmdbEnvironment>) {
    let dir = tempfile::tempdir().unwrap();
    let env = LmdbEnvironment::open(dir.path(), 64 * 1024 * 1024).unwrap();
    (dir, Harness::with_store(env))
}

fn concurrent_votes_sum_exactly<S: GovernanceStore>(h: &Harness<S>) {
    let realm = h.realm("dao", standard_config());
    let proposer = addr("proposer");
    h.fund(&proposer, 1_000);
    let proposal = h.voting(&realm, &proposer);

    let voters: Vec<_> = (0..THREADS).map(|i| addr(&format!("voter{i}"))).collect();
    for (i, voter) in voters.iter().enumerate() {
        h.fund(voter, 100 + i as u64);
    }

    thread::scope(|s| {
        for (i, voter) in voters.iter().enumerate() {
            let engine = &h.engine;
            let id = &proposal.id;
            s.spawn(move || {
                let vote = if i % 2 == 0 { VoteType::Yes } else { VoteType::No };
                engine.cast_vote(voter, id, vote).unwrap();
            });
        }
    });

    let expected_yes: u64 = (0..THREADS).filter(|i| i % 2 == 0).map(|i| 100 + i).sum();
    let expected_no: u64 = (0..THREADS).filter(|i| i % 2 == 1).map(|i| 100 + i).sum();
    let tallied = h.engine.proposal(&proposal.id).unwrap().unwrap();
    assert_eq!(tallied.vote_yes, expected_yes);
    assert_eq!(tallied.vote_no, expected_no);

    let receipts = h.engine.vote_records(&proposal.id).unwrap();
    assert_eq!(receipts.len() as u64, THREADS);
    let receipt_total: u64 = receipts.iter().map(|r| r.vote_weight).sum();
    assert_eq!(receipt_total, expected_yes + expected_no);
}

fn racing_double_vote_counts_once<S: GovernanceStore>(h: &Harness<S>) {
    let realm = h.realm("dao", standard_config());
    let proposer = addr("proposer");
    h.fund(&proposer, 1_000);
    let proposal = h.voting(&realm, &proposer);
    let voter = addr("eager");
    h.fund(&voter, 777);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(|| h.engine.cast_vote(&voter, &proposal.id, VoteType::Yes)))
            .collect();
        handles.into_iter().map(|t| t.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, GovernanceError::AlreadyVoted(_))));
    let tallied = h.engine.proposal(&proposal.id).unwrap().unwrap();
    assert_eq!(tallied.vote_yes, 777);
}

fn concurrent_proposals_get_distinct_sequences<S: GovernanceStore>(h: &Harness<S>) {
    let realm = h.realm("dao", standard_config());
    let proposers: Vec<_> = (0..THREADS).map(|i| addr(&format!("p{i}"))).collect();
    for p in &proposers {
        h.fund(p, 5_000);
    }

    let sequences: BTreeSet<u32> = thread::scope(|s| {
        let handles: Vec<_> = proposers
            .iter()
            .map(|p| {
                let realm = &realm;
                s.spawn(move || h.draft(realm, p).id.sequence)
            })
            .collect();
        handles.into_iter().map(|t| t.join().unwrap()).collect()
    });

    assert_eq!(sequences, (0..THREADS as u32).collect::<BTreeSet<_>>());
    let realm = h.engine.realm(&realm.name).unwrap().unwrap();
    assert_eq!(u64::from(realm.voting_proposal_count), THREADS);
}

fn racing_realm_creation_has_one_winner<S: GovernanceStore>(h: &Harness<S>) {
    let wins = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                s.spawn(move || {
                    let authority = addr(&format!("a{i}"));
                    h.engine
                        .create_realm(&authority, "contested", standard_config(), gov_token())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|r| r.is_ok())
            .count()
    });
    assert_eq!(wins, 1);
}

#[test]
fn null_store_concurrent_votes_sum_exactly() {
    concurrent_votes_sum_exactly(&Harness::new());
}

#[test]
fn null_store_racing_double_vote_counts_once() {
    racing_double_vote_counts_once(&Harness::new());
}

#[test]
fn null_store_concurrent_proposals_get_distinct_sequences() {
    concurrent_proposals_get_distinct_sequences(&Harness::new());
}

#[test]
fn null_store_racing_realm_creation_has_one_winner() {
    racing_realm_creation_has_one_winner(&Harness::new());
}

#[test]
fn lmdb_concurrent_votes_sum_exactly() {
    let (_dir, h) = lmdb_harness();
    concurrent_votes_sum_exactly(&h);
}

#[test]
fn lmdb_racing_double_vote_counts_once() {
    let (_dir, h) = lmdb_harness();
    racing_double_vote_counts_once(&h);
}

#[test]
fn lmdb_concurrent_proposals_get_distinct_sequences() {
    let (_dir, h) = lmdb_harness();
    concurrent_proposals_get_distinct_sequences(&h);
}

#[test]
fn lmdb_racing_realm_creation_has_one_winner() {
    let (_dir, h) = lmdb_harness();
    racing_realm_creation_has_one_winner(&h);
}
