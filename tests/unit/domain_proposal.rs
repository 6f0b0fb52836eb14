use covault_core::domain::proposal::{open_slot, record_approval, ApprovalProgress};
use covault_core::domain::{ProposalStatus, TransferCall};
use covault_core::foundation::{Address, GroupId, MemberId, VaultError};

fn fresh_slot() -> covault_core::domain::ProposalSlot {
    open_slot(
        TransferCall { destination: Address::new("cvdest"), amount: 1_000 },
        MemberId::new("alice"),
        0,
    )
}

#[test]
fn approvals_list_never_contains_duplicates() {
    let group = GroupId::new("g");
    let mut slot = fresh_slot();
    record_approval(&group, &mut slot, &MemberId::new("bob"), 4).unwrap();
    record_approval(&group, &mut slot, &MemberId::new("carol"), 4).unwrap();

    for id in ["alice", "bob", "carol"] {
        let err = record_approval(&group, &mut slot, &MemberId::new(id), 4).unwrap_err();
        assert!(matches!(err, VaultError::AlreadyApproved { .. }));
    }
    assert_eq!(slot.approvals.len(), 3);
}

#[test]
fn first_approver_is_always_the_proposer() {
    let group = GroupId::new("g");
    let mut slot = fresh_slot();
    record_approval(&group, &mut slot, &MemberId::new("bob"), 3).unwrap();
    assert_eq!(slot.proposer().as_str(), "alice");
}

#[test]
fn threshold_monotonicity_no_approval_after_finalizing() {
    let group = GroupId::new("g");
    let mut slot = fresh_slot();
    assert_eq!(record_approval(&group, &mut slot, &MemberId::new("bob"), 2).unwrap(), ApprovalProgress::ThresholdReached);
    assert_eq!(slot.status, ProposalStatus::Finalizing);

    // Neither new members nor existing approvers can touch the slot now.
    let err = record_approval(&group, &mut slot, &MemberId::new("carol"), 2).unwrap_err();
    assert!(matches!(err, VaultError::NoActiveProposal { .. }));
    let err = record_approval(&group, &mut slot, &MemberId::new("alice"), 2).unwrap_err();
    assert!(matches!(err, VaultError::NoActiveProposal { .. }));
    assert_eq!(slot.approvals.len(), 2);
}

#[test]
fn threshold_is_reached_exactly_at_m() {
    let group = GroupId::new("g");
    let mut slot = fresh_slot();
    let threshold = 4u16;
    for (i, id) in ["bob", "carol"].iter().enumerate() {
        match record_approval(&group, &mut slot, &MemberId::new(*id), threshold).unwrap() {
            ApprovalProgress::Collecting { approvals, required } => {
                assert_eq!(approvals, i + 2);
                assert_eq!(required, threshold);
            }
            ApprovalProgress::ThresholdReached => panic!("threshold reached early"),
        }
    }
    let progress = record_approval(&group, &mut slot, &MemberId::new("dave"), threshold).unwrap();
    assert_eq!(progress, ApprovalProgress::ThresholdReached);
}
