//! Versioned entity storage.
//!
//! Entities carry an integer `version` that storage compares and bumps on
//! every write (optimistic concurrency). [`InMemoryStore`] is the reference
//! backend; SQL adapters in the service crates follow the same contract.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::InMemoryStore;

/// Identity and version token of a stored entity.
pub trait Versioned: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn version(&self) -> i64;
    fn set_version(&mut self, version: i64);
}

/// Entities removed by flipping an `active` flag instead of being deleted.
pub trait SoftDelete: Versioned {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

/// Version assigned to a freshly inserted entity.
pub const INITIAL_VERSION: i64 = 0;
