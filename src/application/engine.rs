//! The transport-facing engine: group registration, proposal lifecycle,
//! balance queries, and the audited secret reveal.
//!
//! Every mutating operation on a group runs under that group's slot lock;
//! unrelated groups never contend. The threshold-crossing approval holds the
//! lock through submission, so no caller can observe the Finalizing state or
//! sneak in a second finalize.

use crate::application::submission::SubmissionCoordinator;
use crate::domain::proposal::{close_slot, open_slot, record_approval, ApprovalProgress};
use crate::domain::{
    validate_group_shape, BalanceSnapshot, GroupRecord, Member, SubmissionReceipt, TransferCall,
};
use crate::foundation::{now_nanos, Address, GroupId, MemberId, VaultError};
use crate::infrastructure::chain::ChainClient;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::keys::{KeyCustody, SecretMaterial};
use crate::infrastructure::storage::{GroupStore, MemoryGroupStore};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupCreated {
    pub group_id: GroupId,
    pub threshold: u16,
    pub shared_address: Address,
    pub member_addresses: BTreeMap<MemberId, Address>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProposalOpened {
    pub group_id: GroupId,
    pub proposer: MemberId,
    pub destination: Address,
    pub amount: u128,
    pub approvals: usize,
    pub required: u16,
}

/// What one `approve` call produced.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ApprovalOutcome {
    /// Below threshold; the transport can render "waiting for N more".
    Pending { approvals: usize, required: u16 },
    /// This approval crossed the threshold and the submission succeeded.
    Submitted { receipt: SubmissionReceipt },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProposalRejected {
    pub group_id: GroupId,
    pub rejected_by: MemberId,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GroupBalance {
    pub address: Address,
    pub balance: BalanceSnapshot,
}

pub struct Engine {
    store: Arc<dyn GroupStore>,
    custody: Arc<KeyCustody>,
    chain: Arc<dyn ChainClient>,
    submission: SubmissionCoordinator,
}

impl Engine {
    pub fn new(chain: Arc<dyn ChainClient>, config: EngineConfig) -> Self {
        Self::with_parts(Arc::new(MemoryGroupStore::new()), Arc::new(KeyCustody::new()), chain, config)
    }

    pub fn with_parts(
        store: Arc<dyn GroupStore>,
        custody: Arc<KeyCustody>,
        chain: Arc<dyn ChainClient>,
        config: EngineConfig,
    ) -> Self {
        let submission = SubmissionCoordinator::new(Arc::clone(&chain), Arc::clone(&custody), config.submission);
        Self { store, custody, chain, submission }
    }

    /// One-shot group initialization: generates a custody keypair per member
    /// and derives the shared account over the sorted member addresses.
    pub async fn create_group(
        &self,
        group_id: GroupId,
        members: Vec<Member>,
        threshold: u16,
    ) -> Result<GroupCreated, VaultError> {
        validate_group_shape(&members, threshold)?;
        if self.store.contains_group(&group_id)? {
            return Err(VaultError::GroupAlreadyExists(group_id.to_string()));
        }

        let mut member_addresses = BTreeMap::new();
        for member in &members {
            let record = self.custody.generate(&group_id, &member.member_id)?;
            member_addresses.insert(member.member_id.clone(), record.address);
        }

        // Sorted lexicographically before derivation so any two callers with
        // the same member set obtain the same shared address, independent of
        // registration order.
        let mut sorted_addresses: Vec<Address> = member_addresses.values().cloned().collect();
        sorted_addresses.sort();
        let shared_address = self.chain.derive_multisig_address(&sorted_addresses, threshold)?;

        let record = GroupRecord {
            group_id: group_id.clone(),
            members,
            threshold,
            shared_address: shared_address.clone(),
            member_addresses: member_addresses.clone(),
            created_at_nanos: now_nanos(),
        };
        let handle = self.store.insert_group(record)?;

        info!(
            "group created group_id={} members={} threshold={} shared_address={}",
            group_id,
            handle.record().members.len(),
            threshold,
            shared_address
        );
        Ok(GroupCreated { group_id, threshold, shared_address, member_addresses })
    }

    /// Immutable group facts for transport-side rendering.
    pub fn get_group(&self, group_id: &GroupId) -> Result<GroupRecord, VaultError> {
        Ok(self.store.get_group(group_id)?.record().clone())
    }

    /// Opens the group's proposal slot with the proposer as first approver.
    pub async fn propose(
        &self,
        group_id: &GroupId,
        proposer: &MemberId,
        destination: Address,
        amount: u128,
    ) -> Result<ProposalOpened, VaultError> {
        let handle = self.store.get_group(group_id)?;
        ensure_member(handle.record(), proposer)?;

        let mut slot = handle.lock_slot().await;
        if slot.is_some() {
            return Err(VaultError::ProposalAlreadyActive { group: group_id.to_string() });
        }
        let call = TransferCall { destination: destination.clone(), amount };
        *slot = Some(open_slot(call, proposer.clone(), now_nanos()));

        let required = handle.record().threshold;
        info!(
            "proposal opened group_id={} proposer={} destination={} amount={} approvals=1/{}",
            group_id, proposer, destination, amount, required
        );
        Ok(ProposalOpened {
            group_id: group_id.clone(),
            proposer: proposer.clone(),
            destination,
            amount,
            approvals: 1,
            required,
        })
    }

    /// Records one approval. When the count first reaches the threshold the
    /// approval call is built and submitted before the group lock is
    /// released, and the slot is cleared exactly once whether or not the
    /// submission succeeded; a failure surfaces as `SubmissionFailed`.
    pub async fn approve(&self, group_id: &GroupId, member: &MemberId) -> Result<ApprovalOutcome, VaultError> {
        let handle = self.store.get_group(group_id)?;
        ensure_member(handle.record(), member)?;

        let mut guard = handle.lock_slot().await;
        let slot = guard
            .as_mut()
            .ok_or_else(|| VaultError::NoActiveProposal { group: group_id.to_string() })?;

        match record_approval(group_id, slot, member, handle.record().threshold)? {
            ApprovalProgress::Collecting { approvals, required } => {
                Ok(ApprovalOutcome::Pending { approvals, required })
            }
            ApprovalProgress::ThresholdReached => {
                let result = self.submission.finalize(handle.record(), slot).await;
                if let Some(mut finished) = guard.take() {
                    let _ = close_slot(group_id, &mut finished, if result.is_ok() { "submitted" } else { "submission_failed" });
                }
                match result {
                    Ok(receipt) => Ok(ApprovalOutcome::Submitted { receipt }),
                    Err(err) => {
                        warn!("submission failed group_id={} error={}; slot cleared, a fresh propose is required", group_id, err);
                        Err(VaultError::submission_failed(&err))
                    }
                }
            }
        }
    }

    /// A single reject aborts the proposal for everyone.
    pub async fn reject(&self, group_id: &GroupId, member: &MemberId) -> Result<ProposalRejected, VaultError> {
        let handle = self.store.get_group(group_id)?;
        ensure_member(handle.record(), member)?;

        let mut guard = handle.lock_slot().await;
        let mut slot = guard
            .take()
            .ok_or_else(|| VaultError::NoActiveProposal { group: group_id.to_string() })?;
        close_slot(group_id, &mut slot, "rejected")?;

        info!("proposal rejected group_id={} rejected_by={}", group_id, member);
        Ok(ProposalRejected { group_id: group_id.clone(), rejected_by: member.clone() })
    }

    /// Read-through to the chain for the shared account's balance. No caching.
    pub async fn balance(&self, group_id: &GroupId) -> Result<GroupBalance, VaultError> {
        let handle = self.store.get_group(group_id)?;
        let address = handle.record().shared_address.clone();
        let balance = self.chain.query_account(&address).await?;
        Ok(GroupBalance { address, balance })
    }

    /// Hands out the member's raw secret. The transport layer must deliver
    /// this over a private, non-group channel.
    pub fn reveal_secret(&self, group_id: &GroupId, member: &MemberId) -> Result<SecretMaterial, VaultError> {
        let handle = self.store.get_group(group_id)?;
        ensure_member(handle.record(), member)?;
        self.custody.reveal(group_id, member)
    }
}

fn ensure_member(record: &GroupRecord, member: &MemberId) -> Result<(), VaultError> {
    if record.contains(member) {
        Ok(())
    } else {
        Err(VaultError::unknown_member(record.group_id.to_string(), member.to_string()))
    }
}
