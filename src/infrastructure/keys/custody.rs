//! In-process custody of member keypairs.
//!
//! Keys are generated once per (group, member) at group creation and held in
//! process memory for the process lifetime. Swapping in hardware-backed
//! storage later only touches this module; lifecycle and submission code see
//! the same narrow surface.

use crate::foundation::constants::SEED_SIZE;
use crate::foundation::{Address, GroupId, MemberId, VaultError};
use crate::infrastructure::chain::{address_from_public_key, ExtrinsicSigner};
use crate::infrastructure::keys::audit::{
    CustodyAccessEvent, CustodyAuditLog, CustodyOperation, LogAuditLog, OperationResult,
};
use crate::infrastructure::keys::secret::{SecretBytes, SecretPanicGuard};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use zeroize::Zeroize;

struct MemberKeypair {
    seed: SecretBytes,
    public_key: [u8; 32],
    address: Address,
}

/// Non-secret view of a generated keypair, returned to the registry.
#[derive(Clone, Debug)]
pub struct KeypairRecord {
    pub address: Address,
    pub public_key: Vec<u8>,
}

/// Raw secret material from `reveal`. Delivery over a private channel is the
/// transport layer's obligation.
pub struct SecretMaterial {
    seed_hex: String,
}

impl SecretMaterial {
    pub fn expose(&self) -> &str {
        &self.seed_hex
    }
}

impl std::fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretMaterial([REDACTED])")
    }
}

impl Drop for SecretMaterial {
    fn drop(&mut self) {
        self.seed_hex.zeroize();
    }
}

type CustodyKey = (GroupId, MemberId);

pub struct KeyCustody {
    inner: Mutex<HashMap<CustodyKey, MemberKeypair>>,
    audit: Arc<dyn CustodyAuditLog>,
}

impl KeyCustody {
    pub fn new() -> Self {
        Self::with_audit(Arc::new(LogAuditLog))
    }

    pub fn with_audit(audit: Arc<dyn CustodyAuditLog>) -> Self {
        Self { inner: Mutex::new(HashMap::new()), audit }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, HashMap<CustodyKey, MemberKeypair>>, VaultError> {
        self.inner.lock().map_err(|err| crate::storage_err!("custody lock", err))
    }

    fn audited<T>(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        operation: CustodyOperation,
        result: Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        self.audit.record(CustodyAccessEvent::new(
            group_id.as_str(),
            member_id.as_str(),
            operation,
            OperationResult::from_result(&result),
        ));
        result
    }

    /// Generates and stores the keypair for one member. Exactly-once: a
    /// second call for the same (group, member) pair is an error.
    pub fn generate(&self, group_id: &GroupId, member_id: &MemberId) -> Result<KeypairRecord, VaultError> {
        let result = self.generate_inner(group_id, member_id);
        self.audited(group_id, member_id, CustodyOperation::Generate, result)
    }

    fn generate_inner(&self, group_id: &GroupId, member_id: &MemberId) -> Result<KeypairRecord, VaultError> {
        let mut inner = self.lock_inner()?;
        let key = (group_id.clone(), member_id.clone());
        if inner.contains_key(&key) {
            return Err(VaultError::KeypairAlreadyExists { group: group_id.to_string(), member: member_id.to_string() });
        }

        let mut seed = [0u8; SEED_SIZE];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|err| VaultError::EntropyFailure { details: err.to_string() })?;
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = signing_key.verifying_key().to_bytes();
        let address = address_from_public_key(&public_key);

        inner.insert(key, MemberKeypair { seed: SecretBytes::from_slice(&seed), public_key, address: address.clone() });
        seed.zeroize();

        Ok(KeypairRecord { address, public_key: public_key.to_vec() })
    }

    /// Pure lookup of the member's on-chain address.
    pub fn address_of(&self, group_id: &GroupId, member_id: &MemberId) -> Result<Address, VaultError> {
        let result = self.lookup(group_id, member_id, |kp| kp.address.clone());
        self.audited(group_id, member_id, CustodyOperation::AddressLookup, result)
    }

    pub fn public_key_of(&self, group_id: &GroupId, member_id: &MemberId) -> Result<Vec<u8>, VaultError> {
        let result = self.lookup(group_id, member_id, |kp| kp.public_key.to_vec());
        self.audited(group_id, member_id, CustodyOperation::AddressLookup, result)
    }

    /// Signs an opaque payload with the member's key.
    pub fn sign(&self, group_id: &GroupId, member_id: &MemberId, payload: &[u8]) -> Result<Vec<u8>, VaultError> {
        let result = self.sign_inner(group_id, member_id, payload);
        self.audited(group_id, member_id, CustodyOperation::Sign, result)
    }

    fn sign_inner(&self, group_id: &GroupId, member_id: &MemberId, payload: &[u8]) -> Result<Vec<u8>, VaultError> {
        let seed = self.lookup(group_id, member_id, |kp| kp.seed.expose_owned())?;
        let mut guard = SecretPanicGuard::new(seed);
        let seed_bytes: [u8; SEED_SIZE] = guard
            .get()
            .as_slice()
            .try_into()
            .map_err(|_| VaultError::Message("custody seed must be exactly 32 bytes".to_string()))?;
        let signing_key = SigningKey::from_bytes(&seed_bytes);
        let signature = signing_key.sign(payload);
        let mut owned = guard.take();
        owned.zeroize();
        Ok(signature.to_bytes().to_vec())
    }

    /// Returns the raw secret seed, hex-encoded. Deliberately dangerous;
    /// always audited.
    pub fn reveal(&self, group_id: &GroupId, member_id: &MemberId) -> Result<SecretMaterial, VaultError> {
        let result = self.lookup(group_id, member_id, |kp| SecretMaterial { seed_hex: hex::encode(kp.seed.expose_secret()) });
        self.audited(group_id, member_id, CustodyOperation::Reveal, result)
    }

    /// A signing handle bound to one member; secret bytes stay inside custody.
    pub fn signer(self: &Arc<Self>, group_id: &GroupId, member_id: &MemberId) -> Result<CustodySigner, VaultError> {
        let address = self.lookup(group_id, member_id, |kp| kp.address.clone())?;
        Ok(CustodySigner { custody: Arc::clone(self), group_id: group_id.clone(), member_id: member_id.clone(), address })
    }

    fn lookup<T>(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        extract: impl FnOnce(&MemberKeypair) -> T,
    ) -> Result<T, VaultError> {
        let inner = self.lock_inner()?;
        inner
            .get(&(group_id.clone(), member_id.clone()))
            .map(extract)
            .ok_or_else(|| VaultError::keypair_not_found(group_id.to_string(), member_id.to_string()))
    }
}

impl Default for KeyCustody {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CustodySigner {
    custody: Arc<KeyCustody>,
    group_id: GroupId,
    member_id: MemberId,
    address: Address,
}

impl ExtrinsicSigner for CustodySigner {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, VaultError> {
        self.custody.sign(&self.group_id, &self.member_id, payload)
    }
}
