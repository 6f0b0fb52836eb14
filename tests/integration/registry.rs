use crate::fixtures;
use covault_core::domain::Member;
use covault_core::foundation::{Address, VaultError};
use covault_core::infrastructure::chain::ChainClient;

#[tokio::test]
async fn create_is_one_shot_and_leaves_first_group_untouched() {
    let vault = fixtures::vault();
    let created = fixtures::create_group(&vault, "team", &["alice", "bob", "carol"], 2).await;

    let err = vault
        .engine
        .create_group(fixtures::group_id("team"), fixtures::members(&["dave", "erin"]), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::GroupAlreadyExists(_)));

    let record = vault.engine.get_group(&fixtures::group_id("team")).unwrap();
    assert_eq!(record.threshold, 2);
    assert_eq!(record.members.len(), 3);
    assert_eq!(record.shared_address, created.shared_address);
}

#[tokio::test]
async fn threshold_must_be_within_member_count() {
    let vault = fixtures::vault();
    for bad in [0u16, 4] {
        let err = vault
            .engine
            .create_group(fixtures::group_id("team"), fixtures::members(&["a", "b", "c"]), bad)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::InvalidThreshold { .. }));
    }
    // Nothing was registered by the failed attempts.
    assert!(matches!(vault.engine.get_group(&fixtures::group_id("team")), Err(VaultError::GroupNotFound(_))));
}

#[tokio::test]
async fn duplicate_member_ids_are_rejected() {
    let vault = fixtures::vault();
    let members = vec![Member::new("a", "A"), Member::new("b", "B"), Member::new("a", "A again")];
    let err = vault.engine.create_group(fixtures::group_id("team"), members, 2).await.unwrap_err();
    assert!(matches!(err, VaultError::DuplicateMember { .. }));
}

#[tokio::test]
async fn shared_address_derives_from_sorted_member_addresses() {
    let vault = fixtures::vault();
    let created = fixtures::create_group(&vault, "team", &["carol", "alice", "bob"], 2).await;

    assert_eq!(created.member_addresses.len(), 3);
    let mut sorted: Vec<Address> = created.member_addresses.values().cloned().collect();
    sorted.sort();
    let derived = vault.chain.derive_multisig_address(&sorted, 2).unwrap();
    assert_eq!(derived, created.shared_address);
}

#[tokio::test]
async fn every_member_gets_a_distinct_custody_address() {
    let vault = fixtures::vault();
    let created = fixtures::create_group(&vault, "team", &["alice", "bob", "carol"], 2).await;
    let mut addresses: Vec<&Address> = created.member_addresses.values().collect();
    addresses.sort();
    addresses.dedup();
    assert_eq!(addresses.len(), 3);
    for member in ["alice", "bob", "carol"] {
        let address = vault.custody.address_of(&fixtures::group_id("team"), &fixtures::member_id(member)).unwrap();
        assert_eq!(Some(&address), created.member_addresses.get(&fixtures::member_id(member)));
    }
}
