//! In-memory group registry storage.
//!
//! Durability is an explicit non-goal; groups live for the process lifetime.
//! The registry map lock is short-lived and synchronous. Each group carries
//! its own async mutex around the proposal slot, so mutating operations on
//! one group never block another group, while a single group's operations
//! (including a blocking submission) serialize.

use crate::domain::{GroupRecord, ProposalSlot};
use crate::foundation::{GroupId, VaultError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to one group: immutable facts plus the lockable slot.
#[derive(Clone, Debug)]
pub struct GroupHandle {
    record: Arc<GroupRecord>,
    slot: Arc<tokio::sync::Mutex<Option<ProposalSlot>>>,
}

impl GroupHandle {
    pub fn new(record: GroupRecord) -> Self {
        Self { record: Arc::new(record), slot: Arc::new(tokio::sync::Mutex::new(None)) }
    }

    pub fn record(&self) -> &GroupRecord {
        &self.record
    }

    /// Acquires this group's slot under mutual exclusion. The guard may be
    /// held across awaits (submission) by design.
    pub async fn lock_slot(&self) -> tokio::sync::MutexGuard<'_, Option<ProposalSlot>> {
        self.slot.lock().await
    }
}

pub trait GroupStore: Send + Sync {
    /// Fails with `AlreadyExists` when the group id is taken; the existing
    /// group is left untouched.
    fn insert_group(&self, record: GroupRecord) -> Result<GroupHandle, VaultError>;

    fn get_group(&self, group_id: &GroupId) -> Result<GroupHandle, VaultError>;

    fn contains_group(&self, group_id: &GroupId) -> Result<bool, VaultError>;

    fn list_group_ids(&self) -> Result<Vec<GroupId>, VaultError>;
}

pub struct MemoryGroupStore {
    inner: Mutex<HashMap<GroupId, GroupHandle>>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, HashMap<GroupId, GroupHandle>>, VaultError> {
        self.inner.lock().map_err(|err| crate::storage_err!("group store lock", err))
    }
}

impl Default for MemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStore for MemoryGroupStore {
    fn insert_group(&self, record: GroupRecord) -> Result<GroupHandle, VaultError> {
        let mut inner = self.lock_inner()?;
        if inner.contains_key(&record.group_id) {
            return Err(VaultError::GroupAlreadyExists(record.group_id.to_string()));
        }
        let handle = GroupHandle::new(record);
        inner.insert(handle.record().group_id.clone(), handle.clone());
        Ok(handle)
    }

    fn get_group(&self, group_id: &GroupId) -> Result<GroupHandle, VaultError> {
        self.lock_inner()?
            .get(group_id)
            .cloned()
            .ok_or_else(|| VaultError::GroupNotFound(group_id.to_string()))
    }

    fn contains_group(&self, group_id: &GroupId) -> Result<bool, VaultError> {
        Ok(self.lock_inner()?.contains_key(group_id))
    }

    fn list_group_ids(&self) -> Result<Vec<GroupId>, VaultError> {
        Ok(self.lock_inner()?.keys().cloned().collect())
    }
}
