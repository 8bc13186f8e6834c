//! Domain entities for the token lifecycle.

pub mod token;


// Re-export commonly used types
pub use token::{TokenRecord, MAX_TTL_SECONDS, TOKEN_ENTROPY_BYTES, TOKEN_LENGTH};
