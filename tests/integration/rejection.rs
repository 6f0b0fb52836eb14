use crate::fixtures;
use covault_core::foundation::{Address, VaultError};

#[tokio::test]
async fn single_reject_aborts_for_everyone() {
    let vault = fixtures::vault();
    fixtures::create_group(&vault, "team", &["alice", "bob", "carol", "dave"], 3).await;

    vault
        .engine
        .propose(&fixtures::group_id("team"), &fixtures::member_id("alice"), Address::new("cvdest"), 50)
        .await
        .unwrap();
    vault.engine.approve(&fixtures::group_id("team"), &fixtures::member_id("bob")).await.unwrap();

    let rejected = vault.engine.reject(&fixtures::group_id("team"), &fixtures::member_id("carol")).await.unwrap();
    assert_eq!(rejected.rejected_by.as_str(), "carol");

    // Slot reset: the earlier approvers have nothing left to approve.
    for id in ["alice", "bob", "dave"] {
        let err = vault.engine.approve(&fixtures::group_id("team"), &fixtures::member_id(id)).await.unwrap_err();
        assert!(matches!(err, VaultError::NoActiveProposal { .. }));
    }
    assert!(vault.chain.submitted_extrinsics().is_empty());

    // And a fresh proposal may open.
    vault
        .engine
        .propose(&fixtures::group_id("team"), &fixtures::member_id("bob"), Address::new("cvdest"), 50)
        .await
        .unwrap();
}

#[tokio::test]
async fn reject_without_proposal_is_no_active_proposal() {
    let vault = fixtures::vault();
    fixtures::create_group(&vault, "team", &["alice", "bob"], 2).await;
    let err = vault.engine.reject(&fixtures::group_id("team"), &fixtures::member_id("alice")).await.unwrap_err();
    assert!(matches!(err, VaultError::NoActiveProposal { .. }));
}

#[tokio::test]
async fn outsider_cannot_reject() {
    let vault = fixtures::vault();
    fixtures::create_group(&vault, "team", &["alice", "bob"], 2).await;
    vault
        .engine
        .propose(&fixtures::group_id("team"), &fixtures::member_id("alice"), Address::new("cvdest"), 1)
        .await
        .unwrap();

    let err = vault.engine.reject(&fixtures::group_id("team"), &fixtures::member_id("mallory")).await.unwrap_err();
    assert!(matches!(err, VaultError::UnknownMember { .. }));

    // The proposal survives an outsider's attempt.
    let err = vault
        .engine
        .propose(&fixtures::group_id("team"), &fixtures::member_id("bob"), Address::new("cvother"), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::ProposalAlreadyActive { .. }));
}
