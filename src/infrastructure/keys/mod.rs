//! Key custody: generation, address lookup, signing, and the audited reveal path.
//!
//! Secret material never leaves this module except through [`custody::KeyCustody::reveal`],
//! which the transport layer must deliver over a private channel.

pub mod audit;
pub mod custody;
pub mod secret;

pub use audit::{CustodyAccessEvent, CustodyAuditLog, CustodyOperation, LogAuditLog, MemoryAuditLog, OperationResult};
pub use custody::{CustodySigner, KeyCustody, KeypairRecord, SecretMaterial};
pub use secret::{SecretBytes, SecretPanicGuard};
