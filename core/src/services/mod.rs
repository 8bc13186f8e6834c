//! Business services containing the token lifecycle logic.

pub mod token;

// Re-export commonly used types
pub use token::{TokenGenerator, TokenManager, TokenManagerConfig};
