//! Chain-client boundary.
//!
//! The engine is chain-agnostic: everything protocol-specific (call
//! encoding, address derivation, extrinsic signing and submission) sits
//! behind [`ChainClient`]. The in-process [`mock::MockChainClient`] is the
//! only implementation shipped here; a networked backend plugs in without
//! touching lifecycle or submission code.

pub mod mock;

use crate::domain::{BalanceSnapshot, SubmissionReceipt};
use crate::foundation::constants::ADDRESS_PREFIX;
use crate::foundation::{Address, CallHash, VaultError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use mock::MockChainClient;

/// Chain call in its pre-encoding form.
///
/// Opaque to the engine apart from the fields needed to hash it; argument
/// values are canonical strings and the map is ordered, so
/// [`CallDescriptor::canonical_bytes`] is deterministic.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CallDescriptor {
    pub call_module: String,
    pub call_function: String,
    pub call_args: BTreeMap<String, String>,
}

impl CallDescriptor {
    pub fn new(call_module: impl Into<String>, call_function: impl Into<String>) -> Self {
        Self { call_module: call_module.into(), call_function: call_function.into(), call_args: BTreeMap::new() }
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.call_args.insert(name.into(), value.into());
        self
    }

    pub fn canonical_bytes(&self) -> Result<Vec<u8>, VaultError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Signing capability handed to the chain client at submission time.
///
/// Implemented by custody so secret bytes never cross this boundary.
pub trait ExtrinsicSigner: Send + Sync {
    fn address(&self) -> &Address;
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, VaultError>;
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Derives the shared account address. Callers must pass the member
    /// addresses already sorted lexicographically; the same set must always
    /// yield the same address.
    fn derive_multisig_address(&self, sorted_addresses: &[Address], threshold: u16) -> Result<Address, VaultError>;

    fn compose_transfer_call(&self, destination: &Address, amount: u128) -> Result<CallDescriptor, VaultError>;

    /// Fixed 32-byte digest over the call's canonical bytes.
    fn hash_call(&self, call: &CallDescriptor) -> Result<CallHash, VaultError>;

    fn compose_approval_call(
        &self,
        threshold: u16,
        other_signatories: &[Address],
        call_hash: &CallHash,
    ) -> Result<CallDescriptor, VaultError>;

    /// Signs and submits, blocking until inclusion when requested.
    async fn sign_and_submit(
        &self,
        call: &CallDescriptor,
        signer: &dyn ExtrinsicSigner,
        wait_for_inclusion: bool,
    ) -> Result<SubmissionReceipt, VaultError>;

    async fn query_account(&self, address: &Address) -> Result<BalanceSnapshot, VaultError>;
}

/// Address encoding shared by member keys and derived multisig accounts:
/// prefixed hex of a 32-byte blake3 digest of the public key.
pub fn address_from_public_key(public_key: &[u8]) -> Address {
    let digest = blake3::hash(public_key);
    Address::new(format!("{ADDRESS_PREFIX}{}", hex::encode(digest.as_bytes())))
}
