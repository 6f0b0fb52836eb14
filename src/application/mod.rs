//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod engine;
pub mod submission;

pub use engine::{ApprovalOutcome, Engine, GroupBalance, GroupCreated, ProposalOpened, ProposalRejected};
pub use submission::SubmissionCoordinator;
