//! Account Snapshot Adapters
//!
//! Implementations of `AccountSnapshotPort`.

pub mod file;
pub mod in_memory;

pub use file::FileAccountSnapshot;
pub use in_memory::InMemoryAccountSnapshot;
