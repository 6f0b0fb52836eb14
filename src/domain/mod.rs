//! Domain layer: the pure data model and proposal lifecycle rules. No I/O here.

pub mod model;
pub mod proposal;

pub use model::{
    validate_group_shape, BalanceSnapshot, GroupRecord, Member, ProposalSlot, ProposalStatus, SubmissionReceipt,
    TransferCall,
};
pub use proposal::{close_slot, open_slot, other_signatories, record_approval, ApprovalProgress};
