//! Domain layer containing the token record entity.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
