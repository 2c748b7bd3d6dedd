//! Audit Recorder Adapters
//!
//! Implementations of `AuditRecorderPort`.

pub mod in_memory;
pub mod jsonl;

pub use in_memory::InMemoryAuditRecorder;
pub use jsonl::JsonlAuditRecorder;
