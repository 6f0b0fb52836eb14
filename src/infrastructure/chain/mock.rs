//! In-process chain client used by tests and local development.

use crate::domain::{BalanceSnapshot, SubmissionReceipt};
use crate::foundation::{Address, BlockHash, CallHash, ExtrinsicHash, VaultError};
use crate::infrastructure::chain::{address_from_public_key, CallDescriptor, ChainClient, ExtrinsicSigner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Record of one accepted submission, kept for assertions.
#[derive(Clone, Debug)]
pub struct SubmittedExtrinsic {
    pub call: CallDescriptor,
    pub signer_address: Address,
    pub signature: Vec<u8>,
    pub wait_for_inclusion: bool,
}

pub struct MockChainClient {
    balances: Mutex<HashMap<Address, BalanceSnapshot>>,
    submitted: Mutex<Vec<SubmittedExtrinsic>>,
    fail_submissions: AtomicBool,
    submit_delay_ms: AtomicU64,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            fail_submissions: AtomicBool::new(false),
            submit_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn set_balance(&self, address: Address, balance: BalanceSnapshot) {
        if let Ok(mut balances) = self.balances.lock() {
            balances.insert(address, balance);
        }
    }

    pub fn submitted_extrinsics(&self) -> Vec<SubmittedExtrinsic> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Makes every subsequent `sign_and_submit` fail with `ChainError`.
    pub fn set_fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::Relaxed);
    }

    /// Delays `sign_and_submit` to simulate network and inclusion latency.
    pub fn set_submit_delay_ms(&self, millis: u64) {
        self.submit_delay_ms.store(millis, Ordering::Relaxed);
    }
}

impl Default for MockChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn derive_multisig_address(&self, sorted_addresses: &[Address], threshold: u16) -> Result<Address, VaultError> {
        if sorted_addresses.is_empty() {
            return Err(VaultError::chain_error("cannot derive a multisig address from an empty signatory set"));
        }
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"covault/multisig/v1");
        for address in sorted_addresses {
            hasher.update(address.as_str().as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(&threshold.to_le_bytes());
        Ok(address_from_public_key(hasher.finalize().as_bytes()))
    }

    fn compose_transfer_call(&self, destination: &Address, amount: u128) -> Result<CallDescriptor, VaultError> {
        Ok(CallDescriptor::new("Balances", "transfer_allow_death")
            .arg("dest", destination.as_str())
            .arg("value", amount.to_string()))
    }

    fn hash_call(&self, call: &CallDescriptor) -> Result<CallHash, VaultError> {
        let bytes = call.canonical_bytes()?;
        Ok(CallHash::new(*blake3::hash(&bytes).as_bytes()))
    }

    fn compose_approval_call(
        &self,
        threshold: u16,
        other_signatories: &[Address],
        call_hash: &CallHash,
    ) -> Result<CallDescriptor, VaultError> {
        let signatories = serde_json::to_string(other_signatories)?;
        Ok(CallDescriptor::new("Multisig", "approve_as_multi")
            .arg("threshold", threshold.to_string())
            .arg("other_signatories", signatories)
            .arg("call_hash", call_hash.to_string()))
    }

    async fn sign_and_submit(
        &self,
        call: &CallDescriptor,
        signer: &dyn ExtrinsicSigner,
        wait_for_inclusion: bool,
    ) -> Result<SubmissionReceipt, VaultError> {
        let delay = self.submit_delay_ms.load(Ordering::Relaxed);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_submissions.load(Ordering::Relaxed) {
            return Err(VaultError::chain_error("submission rejected by node"));
        }

        let payload = call.canonical_bytes()?;
        let signature = signer.sign(&payload)?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(&payload);
        hasher.update(&signature);
        let extrinsic_hash = ExtrinsicHash::new(*hasher.finalize().as_bytes());

        let included_in = wait_for_inclusion.then(|| {
            let mut block = blake3::Hasher::new();
            block.update(extrinsic_hash.as_ref());
            block.update(b"included");
            BlockHash::new(*block.finalize().as_bytes())
        });

        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(SubmittedExtrinsic {
                call: call.clone(),
                signer_address: signer.address().clone(),
                signature,
                wait_for_inclusion,
            });
        }

        Ok(SubmissionReceipt { extrinsic_hash, included_in })
    }

    async fn query_account(&self, address: &Address) -> Result<BalanceSnapshot, VaultError> {
        let balances = self.balances.lock().map_err(|err| crate::storage_err!("mock chain balances lock", err))?;
        // Unknown accounts read as empty, matching on-chain semantics.
        Ok(balances.get(address).copied().unwrap_or_default())
    }
}
