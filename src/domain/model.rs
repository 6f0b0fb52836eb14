use crate::foundation::constants::{MAX_DISPLAY_NAME_LENGTH, MAX_GROUP_MEMBERS};
use crate::foundation::{Address, BlockHash, ExtrinsicHash, GroupId, MemberId, VaultError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A group participant. Created at registration, immutable afterward.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Member {
    /// Opaque stable identifier (e.g. a chat user id).
    pub member_id: MemberId,
    pub display_name: String,
}

impl Member {
    pub fn new(member_id: impl Into<MemberId>, display_name: impl Into<String>) -> Self {
        Self { member_id: member_id.into(), display_name: display_name.into() }
    }
}

/// The single call shape a proposal may carry: a transfer out of the shared account.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TransferCall {
    pub destination: Address,
    pub amount: u128,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Collecting approvals.
    Open,
    /// Threshold reached, submission in progress.
    Finalizing,
    /// Terminal: cleared after submission (success or failure) or rejection.
    Closed,
}

/// The at-most-one pending transaction of a group.
///
/// The approvals list is insertion-ordered and duplicate-free; its first
/// entry is always the original proposer.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProposalSlot {
    pub call: TransferCall,
    pub approvals: Vec<MemberId>,
    pub status: ProposalStatus,
    pub opened_at_nanos: u64,
}

impl ProposalSlot {
    pub fn proposer(&self) -> &MemberId {
        // Constructed with the proposer as sole approver; the list never shrinks.
        &self.approvals[0]
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    pub fn has_approved(&self, member: &MemberId) -> bool {
        self.approvals.iter().any(|m| m == member)
    }
}

/// Immutable facts about a group, fixed at creation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupRecord {
    pub group_id: GroupId,
    /// Registration order is preserved; address derivation sorts separately.
    pub members: Vec<Member>,
    pub threshold: u16,
    /// The jointly controlled account, derived over the sorted member addresses.
    pub shared_address: Address,
    pub member_addresses: BTreeMap<MemberId, Address>,
    pub created_at_nanos: u64,
}

impl GroupRecord {
    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.iter().any(|m| &m.member_id == member)
    }

    pub fn address_of(&self, member: &MemberId) -> Option<&Address> {
        self.member_addresses.get(member)
    }
}

/// Point-in-time account balance. Returned directly from a query, never cached.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub free: u128,
    pub reserved: u128,
    pub frozen: u128,
    pub flags: u128,
}

/// Acknowledgment of an accepted submission.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub extrinsic_hash: ExtrinsicHash,
    /// Set when the client waited for inclusion.
    pub included_in: Option<BlockHash>,
}

/// Validates the member set and threshold of a group about to be created.
///
/// Registration order is the caller's; this only rejects shapes the chain
/// would refuse (empty set, out-of-range threshold, duplicate signatories).
pub fn validate_group_shape(members: &[Member], threshold: u16) -> Result<(), VaultError> {
    if threshold < 1 || usize::from(threshold) > members.len() {
        return Err(VaultError::InvalidThreshold { threshold, members: members.len() });
    }
    if members.len() > MAX_GROUP_MEMBERS {
        return Err(VaultError::Message(format!("group size {} exceeds maximum {}", members.len(), MAX_GROUP_MEMBERS)));
    }
    let mut seen: Vec<&MemberId> = Vec::with_capacity(members.len());
    for member in members {
        if member.display_name.len() > MAX_DISPLAY_NAME_LENGTH {
            return Err(VaultError::Message(format!("display name too long for member {}", member.member_id)));
        }
        if seen.contains(&&member.member_id) {
            return Err(VaultError::DuplicateMember { member: member.member_id.to_string() });
        }
        seen.push(&member.member_id);
    }
    Ok(())
}
