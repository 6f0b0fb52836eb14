//! Proposal lifecycle rules: Open -> Finalizing -> Closed, or Open -> Closed on reject.
//!
//! The "Empty" state of a group is represented by the absence of a slot
//! (`Option<ProposalSlot>` owned by the group store); everything here
//! operates on an existing slot.

use crate::domain::model::{ProposalSlot, ProposalStatus, TransferCall};
use crate::foundation::{Address, GroupId, MemberId, VaultError};
use log::{info, warn};
use std::collections::BTreeMap;

const VALID_TRANSITIONS: &[(ProposalStatus, ProposalStatus)] = &[
    (ProposalStatus::Open, ProposalStatus::Finalizing),
    (ProposalStatus::Open, ProposalStatus::Closed),
    (ProposalStatus::Finalizing, ProposalStatus::Closed),
];

pub fn ensure_valid_transition(from: ProposalStatus, to: ProposalStatus) -> Result<(), VaultError> {
    if VALID_TRANSITIONS.contains(&(from, to)) {
        Ok(())
    } else {
        Err(VaultError::InvalidStateTransition { from: format!("{from:?}"), to: format!("{to:?}") })
    }
}

/// Outcome of recording one approval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApprovalProgress {
    /// Still below threshold.
    Collecting { approvals: usize, required: u16 },
    /// This approval crossed the threshold; the slot is now Finalizing and
    /// must be handed to the submission coordinator before the group lock
    /// is released.
    ThresholdReached,
}

/// Opens a fresh slot with the proposer as sole approver.
pub fn open_slot(call: TransferCall, proposer: MemberId, now_nanos: u64) -> ProposalSlot {
    ProposalSlot { call, approvals: vec![proposer], status: ProposalStatus::Open, opened_at_nanos: now_nanos }
}

/// Appends one approval, transitioning to Finalizing when the count first
/// reaches the threshold.
///
/// A duplicate approval is an error, not a no-op, and leaves the slot
/// untouched.
pub fn record_approval(
    group_id: &GroupId,
    slot: &mut ProposalSlot,
    member: &MemberId,
    threshold: u16,
) -> Result<ApprovalProgress, VaultError> {
    if slot.status != ProposalStatus::Open {
        warn!(
            "approval refused group_id={} member={} status={:?}",
            group_id, member, slot.status
        );
        return Err(VaultError::NoActiveProposal { group: group_id.to_string() });
    }
    if slot.has_approved(member) {
        return Err(VaultError::AlreadyApproved { member: member.to_string() });
    }

    slot.approvals.push(member.clone());
    let approvals = slot.approval_count();
    if approvals < usize::from(threshold) {
        info!(
            "approval recorded group_id={} member={} approvals={}/{}",
            group_id, member, approvals, threshold
        );
        return Ok(ApprovalProgress::Collecting { approvals, required: threshold });
    }

    ensure_valid_transition(slot.status, ProposalStatus::Finalizing)?;
    slot.status = ProposalStatus::Finalizing;
    info!(
        "proposal state transition group_id={} from_state=Open to_state=Finalizing approvals={}/{}",
        group_id, approvals, threshold
    );
    Ok(ApprovalProgress::ThresholdReached)
}

/// Stamps the slot terminal. Valid from Open (reject) and Finalizing (cleared
/// after a submission attempt).
pub fn close_slot(group_id: &GroupId, slot: &mut ProposalSlot, reason: &str) -> Result<(), VaultError> {
    let from = slot.status;
    if let Err(err) = ensure_valid_transition(from, ProposalStatus::Closed) {
        warn!("invalid proposal state transition group_id={} from_state={:?} to_state=Closed error={}", group_id, from, err);
        return Err(err);
    }
    slot.status = ProposalStatus::Closed;
    info!("proposal state transition group_id={} from_state={:?} to_state=Closed reason={}", group_id, from, reason);
    Ok(())
}

/// The approval call's signatory list: every approver except the proposer,
/// mapped to addresses and sorted lexicographically so the result does not
/// depend on approval arrival order.
pub fn other_signatories(
    group_id: &GroupId,
    slot: &ProposalSlot,
    member_addresses: &BTreeMap<MemberId, Address>,
) -> Result<Vec<Address>, VaultError> {
    let mut out = Vec::with_capacity(slot.approvals.len().saturating_sub(1));
    for member in slot.approvals.iter().skip(1) {
        let address = member_addresses
            .get(member)
            .ok_or_else(|| VaultError::keypair_not_found(group_id.to_string(), member.to_string()))?;
        out.push(address.clone());
    }
    out.sort();
    Ok(out)
}
