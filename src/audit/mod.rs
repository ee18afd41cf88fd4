//! Audit logging for Budget Master
//!
//! Every create, update and delete of ledger data is appended to a JSONL
//! audit log with the before/after values of the record.
//!
//! - `AuditEntry`: one logged operation on one entity
//! - `AuditLogger`: appends entries to the log and reads them back
//! - `generate_diff`: top-level field diff used as the entry summary

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
