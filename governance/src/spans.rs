//! Span constructors for governance requests.
//!
//! Every engine request runs inside one of these spans, so the commit or
//! rejection log lines carry the action, target and caller.

use quorum_types::{Address, ProposalId, RealmName};
use tracing::{info_span, Span};

/// Span covering a realm-level request.
pub fn realm_span(action: &'static str, realm: &RealmName, caller: &Address) -> Span {
    info_span!("governance", action, realm = %realm, caller = %caller)
}

/// Span covering a proposal-level request.
pub fn proposal_span(action: &'static str, proposal: &ProposalId, caller: &Address) -> Span {
    info_span!("governance", action, proposal = %proposal, caller = %caller)
}
