//! Builds and submits the aggregated approval call for a finalized proposal.

use crate::domain::{other_signatories, GroupRecord, ProposalSlot, SubmissionReceipt};
use crate::foundation::VaultError;
use crate::infrastructure::chain::ChainClient;
use crate::infrastructure::config::SubmissionConfig;
use crate::infrastructure::keys::KeyCustody;
use log::info;
use std::sync::Arc;

pub struct SubmissionCoordinator {
    chain: Arc<dyn ChainClient>,
    custody: Arc<KeyCustody>,
    config: SubmissionConfig,
}

impl SubmissionCoordinator {
    pub fn new(chain: Arc<dyn ChainClient>, custody: Arc<KeyCustody>, config: SubmissionConfig) -> Self {
        Self { chain, custody, config }
    }

    /// Invoked only by the lifecycle at the Open -> Finalizing edge, at most
    /// once per slot instance. The caller holds the group lock for the
    /// duration and clears the slot regardless of the outcome.
    pub async fn finalize(&self, group: &GroupRecord, slot: &ProposalSlot) -> Result<SubmissionReceipt, VaultError> {
        let others = other_signatories(&group.group_id, slot, &group.member_addresses)?;

        let transfer = self.chain.compose_transfer_call(&slot.call.destination, slot.call.amount)?;
        let call_hash = self.chain.hash_call(&transfer)?;
        let approval = self.chain.compose_approval_call(group.threshold, &others, &call_hash)?;

        // The proposer is the signer of record; everyone else rides along as
        // other_signatories in the approve-as-multi call.
        let signer = self.custody.signer(&group.group_id, slot.proposer())?;

        let timeout = self.config.submit_timeout();
        let receipt = match tokio::time::timeout(
            timeout,
            self.chain.sign_and_submit(&approval, &signer, self.config.wait_for_inclusion),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(VaultError::chain_error(format!(
                    "sign_and_submit exceeded the {}s submission bound",
                    timeout.as_secs()
                )))
            }
        };

        info!(
            "approval call submitted group_id={} proposer={} other_signatories={} call_hash={} extrinsic_hash={}",
            group.group_id,
            slot.proposer(),
            others.len(),
            call_hash,
            receipt.extrinsic_hash
        );
        Ok(receipt)
    }
}
