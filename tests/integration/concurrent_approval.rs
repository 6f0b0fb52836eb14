use crate::fixtures;
use covault_core::application::ApprovalOutcome;
use covault_core::foundation::{Address, VaultError};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approvals_submit_exactly_once() {
    let vault = fixtures::vault();
    fixtures::create_group(&vault, "team", &["m1", "m2", "m3", "m4", "m5", "m6"], 4).await;

    vault
        .engine
        .propose(&fixtures::group_id("team"), &fixtures::member_id("m1"), Address::new("cvdest"), 1_000)
        .await
        .unwrap();

    let engine = Arc::new(vault.engine);
    let mut tasks = Vec::new();
    for id in ["m2", "m3", "m4", "m5", "m6"] {
        let engine = Arc::clone(&engine);
        let member = fixtures::member_id(id);
        tasks.push(tokio::spawn(async move {
            engine.approve(&fixtures::group_id("team"), &member).await
        }));
    }

    let mut submitted = 0usize;
    let mut pending = 0usize;
    let mut late = 0usize;
    for task in tasks {
        match task.await.unwrap() {
            Ok(ApprovalOutcome::Submitted { .. }) => submitted += 1,
            Ok(ApprovalOutcome::Pending { .. }) => pending += 1,
            Err(VaultError::NoActiveProposal { .. }) => late += 1,
            Err(other) => panic!("unexpected error under contention: {other}"),
        }
    }

    // Exactly one caller crossed the threshold; exactly one extrinsic exists.
    assert_eq!(submitted, 1);
    assert_eq!(pending, 2);
    assert_eq!(late, 2);
    assert_eq!(vault.chain.submitted_extrinsics().len(), 1);

    // Slot cleared once; the group accepts a fresh proposal.
    engine
        .propose(&fixtures::group_id("team"), &fixtures::member_id("m2"), Address::new("cvnext"), 5)
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_finalize_does_not_block_other_groups() {
    let vault = fixtures::vault();
    fixtures::create_group(&vault, "slow", &["a1", "a2"], 2).await;
    fixtures::create_group(&vault, "fast", &["b1", "b2"], 2).await;
    vault.chain.set_submit_delay_ms(500);

    let engine = Arc::new(vault.engine);
    engine
        .propose(&fixtures::group_id("slow"), &fixtures::member_id("a1"), Address::new("cvdest"), 1)
        .await
        .unwrap();

    // Kick off the slow group's finalize; it holds that group's lock only.
    let slow = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.approve(&fixtures::group_id("slow"), &fixtures::member_id("a2")).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    engine
        .propose(&fixtures::group_id("fast"), &fixtures::member_id("b1"), Address::new("cvdest"), 2)
        .await
        .unwrap();
    engine.reject(&fixtures::group_id("fast"), &fixtures::member_id("b2")).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(400), "unrelated group was blocked by a finalizing group");

    assert!(matches!(slow.await.unwrap().unwrap(), ApprovalOutcome::Submitted { .. }));
}
