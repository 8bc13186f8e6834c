//! Token storage: the backend contract and the in-memory implementation
//!
//! - `StorageBackend` - async trait every token store implements
//! - `InMemoryBackend` - default process-local store
//! - `sweeper` - periodic reclamation of expired in-memory records

mod backend;
mod memory;
pub mod sweeper;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockBackend;

#[cfg(test)]
mod tests;

pub use backend::StorageBackend;
pub use memory::InMemoryBackend;
pub use sweeper::{SweepReport, SweeperConfig};
