use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AlreadyExists,
    NotFound,
    InvalidThreshold,
    UnknownMember,
    DuplicateMember,
    ProposalAlreadyActive,
    NoActiveProposal,
    AlreadyApproved,
    SubmissionFailed,
    ChainError,
    InvalidStateTransition,
    EntropyFailure,
    StorageError,
    ConfigError,
    SerializationError,
    EncodingError,
    Message,
}

/// Error kind + rendered message, suitable for transport-layer payloads.
///
/// Never contains secret material; `VaultError` variants carry identifiers
/// and counts only.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("group already exists: {0}")]
    GroupAlreadyExists(String),

    #[error("keypair already generated for member {member} of group {group}")]
    KeypairAlreadyExists { group: String, member: String },

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("no keypair in custody for member {member} of group {group}")]
    KeypairNotFound { group: String, member: String },

    #[error("invalid threshold {threshold} for {members} members")]
    InvalidThreshold { threshold: u16, members: usize },

    #[error("member {member} does not belong to group {group}")]
    UnknownMember { group: String, member: String },

    #[error("duplicate member in group creation: {member}")]
    DuplicateMember { member: String },

    #[error("group {group} already has an active proposal")]
    ProposalAlreadyActive { group: String },

    #[error("group {group} has no active proposal")]
    NoActiveProposal { group: String },

    #[error("member {member} already approved the active proposal")]
    AlreadyApproved { member: String },

    #[error("submission failed: {cause}")]
    SubmissionFailed { cause: String },

    #[error("chain error: {detail}")]
    ChainError { detail: String },

    #[error("invalid proposal state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("entropy source failure: {details}")]
    EntropyFailure { details: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

impl VaultError {
    pub fn code(&self) -> ErrorCode {
        match self {
            VaultError::GroupAlreadyExists(_) => ErrorCode::AlreadyExists,
            VaultError::KeypairAlreadyExists { .. } => ErrorCode::AlreadyExists,
            VaultError::GroupNotFound(_) => ErrorCode::NotFound,
            VaultError::KeypairNotFound { .. } => ErrorCode::NotFound,
            VaultError::InvalidThreshold { .. } => ErrorCode::InvalidThreshold,
            VaultError::UnknownMember { .. } => ErrorCode::UnknownMember,
            VaultError::DuplicateMember { .. } => ErrorCode::DuplicateMember,
            VaultError::ProposalAlreadyActive { .. } => ErrorCode::ProposalAlreadyActive,
            VaultError::NoActiveProposal { .. } => ErrorCode::NoActiveProposal,
            VaultError::AlreadyApproved { .. } => ErrorCode::AlreadyApproved,
            VaultError::SubmissionFailed { .. } => ErrorCode::SubmissionFailed,
            VaultError::ChainError { .. } => ErrorCode::ChainError,
            VaultError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            VaultError::EntropyFailure { .. } => ErrorCode::EntropyFailure,
            VaultError::StorageError { .. } => ErrorCode::StorageError,
            VaultError::ConfigError(_) => ErrorCode::ConfigError,
            VaultError::SerializationError { .. } => ErrorCode::SerializationError,
            VaultError::EncodingError(_) => ErrorCode::EncodingError,
            VaultError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    pub fn unknown_member(group: impl Into<String>, member: impl Into<String>) -> Self {
        VaultError::UnknownMember { group: group.into(), member: member.into() }
    }

    pub fn keypair_not_found(group: impl Into<String>, member: impl Into<String>) -> Self {
        VaultError::KeypairNotFound { group: group.into(), member: member.into() }
    }

    pub fn chain_error(detail: impl Into<String>) -> Self {
        VaultError::ChainError { detail: detail.into() }
    }

    /// Wraps any finalize-time failure into the single surfaced kind (§ partial-failure policy).
    pub fn submission_failed(cause: &VaultError) -> Self {
        VaultError::SubmissionFailed { cause: cause.to_string() }
    }
}

impl From<hex::FromHexError> for VaultError {
    fn from(err: hex::FromHexError) -> Self {
        VaultError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<io::Error> for VaultError {
    fn from(err: io::Error) -> Self {
        VaultError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::VaultError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `VaultError` variants at the call site to preserve context.
