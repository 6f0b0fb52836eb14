use covault_core::foundation::{ErrorCode, VaultError};

#[test]
fn taxonomy_maps_to_stable_codes() {
    let cases: Vec<(VaultError, ErrorCode)> = vec![
        (VaultError::GroupAlreadyExists("g".into()), ErrorCode::AlreadyExists),
        (VaultError::GroupNotFound("g".into()), ErrorCode::NotFound),
        (VaultError::keypair_not_found("g", "m"), ErrorCode::NotFound),
        (VaultError::InvalidThreshold { threshold: 0, members: 2 }, ErrorCode::InvalidThreshold),
        (VaultError::unknown_member("g", "m"), ErrorCode::UnknownMember),
        (VaultError::ProposalAlreadyActive { group: "g".into() }, ErrorCode::ProposalAlreadyActive),
        (VaultError::NoActiveProposal { group: "g".into() }, ErrorCode::NoActiveProposal),
        (VaultError::AlreadyApproved { member: "m".into() }, ErrorCode::AlreadyApproved),
        (VaultError::SubmissionFailed { cause: "x".into() }, ErrorCode::SubmissionFailed),
        (VaultError::chain_error("x"), ErrorCode::ChainError),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code, "code mismatch for {err}");
    }
}

#[test]
fn error_context_is_transport_ready() {
    let ctx = VaultError::unknown_member("team", "mallory").context();
    assert_eq!(ctx.code, ErrorCode::UnknownMember);
    assert!(ctx.message.contains("mallory"));
    assert!(ctx.message.contains("team"));
}
