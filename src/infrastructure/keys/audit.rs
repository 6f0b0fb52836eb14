//! Audit logging for custody operations.
//!
//! Every access to key material is recorded, including the deliberately
//! dangerous `reveal` path. Persistence is out of scope; the default sink
//! writes structured lines through `log`.

use crate::foundation::now_nanos;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum OperationResult {
    Success,
    Failure { error: String },
}

impl OperationResult {
    pub fn from_result<T, E: std::fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => Self::Failure { error: e.to_string() },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CustodyOperation {
    Generate,
    AddressLookup,
    Sign,
    Reveal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustodyAccessEvent {
    pub timestamp: u64,
    pub group_id: String,
    pub member_id: String,
    pub operation: CustodyOperation,
    pub result: OperationResult,
}

impl CustodyAccessEvent {
    pub fn new(group_id: &str, member_id: &str, operation: CustodyOperation, result: OperationResult) -> Self {
        Self { timestamp: now_nanos(), group_id: group_id.to_string(), member_id: member_id.to_string(), operation, result }
    }
}

pub trait CustodyAuditLog: Send + Sync {
    fn record(&self, event: CustodyAccessEvent);
}

/// Default sink: one structured info line per access, warn on failures.
pub struct LogAuditLog;

impl CustodyAuditLog for LogAuditLog {
    fn record(&self, event: CustodyAccessEvent) {
        match &event.result {
            OperationResult::Success => log::info!(
                "custody access group_id={} member_id={} operation={:?}",
                event.group_id,
                event.member_id,
                event.operation
            ),
            OperationResult::Failure { error } => log::warn!(
                "custody access failed group_id={} member_id={} operation={:?} error={}",
                event.group_id,
                event.member_id,
                event.operation,
                error
            ),
        }
    }
}

/// Test sink recording every event in memory.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<CustodyAccessEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CustodyAccessEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl CustodyAuditLog for MemoryAuditLog {
    fn record(&self, event: CustodyAccessEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
