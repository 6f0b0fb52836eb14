//! Shared helpers for unit and integration tests.
#![allow(dead_code)]

use covault_core::application::{Engine, GroupCreated};
use covault_core::domain::Member;
use covault_core::foundation::{GroupId, MemberId};
use covault_core::infrastructure::chain::MockChainClient;
use covault_core::infrastructure::config::EngineConfig;
use covault_core::infrastructure::keys::{KeyCustody, MemoryAuditLog};
use covault_core::infrastructure::storage::MemoryGroupStore;
use std::sync::Arc;

pub struct TestVault {
    pub engine: Engine,
    pub chain: Arc<MockChainClient>,
    pub custody: Arc<KeyCustody>,
    pub audit: Arc<MemoryAuditLog>,
}

/// Engine wired to the in-process chain client with a recording audit log.
pub fn vault() -> TestVault {
    vault_with_config(EngineConfig::default())
}

pub fn vault_with_config(config: EngineConfig) -> TestVault {
    let chain = Arc::new(MockChainClient::new());
    let audit = Arc::new(MemoryAuditLog::new());
    let custody = Arc::new(KeyCustody::with_audit(audit.clone()));
    let engine = Engine::with_parts(Arc::new(MemoryGroupStore::new()), custody.clone(), chain.clone(), config);
    TestVault { engine, chain, custody, audit }
}

pub fn members(ids: &[&str]) -> Vec<Member> {
    ids.iter().map(|id| Member::new(*id, format!("user-{id}"))).collect()
}

pub fn group_id(id: &str) -> GroupId {
    GroupId::new(id)
}

pub fn member_id(id: &str) -> MemberId {
    MemberId::new(id)
}

pub async fn create_group(vault: &TestVault, id: &str, member_ids: &[&str], threshold: u16) -> GroupCreated {
    vault
        .engine
        .create_group(group_id(id), members(member_ids), threshold)
        .await
        .expect("group creation")
}
