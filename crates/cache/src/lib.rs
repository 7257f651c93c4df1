//! Dual-backend read-through cache for Syracuse number records.
//!
//! [`CacheCoordinator`] keeps the metadata store and the blob store
//! consistent for each number: a record is either complete in both or
//! reported as missing.

pub mod assembler;
pub mod coordinator;
pub mod error;
pub mod presence;

pub use assembler::{ReadOutcome, assemble};
pub use coordinator::{CacheCoordinator, Lookup, WriteOutcome};
pub use error::{Backend, CacheError, CacheResult};
pub use presence::PresenceState;
