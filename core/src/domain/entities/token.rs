//! Token record entity stored by every backend.

use std::time::Duration;

use tokio::time::Instant;

use crate::errors::{TokenError, TokenResult};

/// Number of random bytes drawn for each generated token
pub const TOKEN_ENTROPY_BYTES: usize = 256;

/// Length of an issued token: a hex-encoded SHA-512 digest
pub const TOKEN_LENGTH: usize = 128;

/// Longest lifetime a backend accepts (100 years)
pub const MAX_TTL_SECONDS: u64 = 60 * 60 * 24 * 365 * 100;

/// Fallback horizon when `now + ttl` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Payload bound to a token together with its lifetime
///
/// `expires_at` is always `issue/refresh time + ttl`; a refresh restarts the
/// original window instead of extending the previous deadline. A record is
/// valid strictly before `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Caller data bound to the token (user id, session id...)
    pub payload: String,

    /// Lifetime in seconds, reapplied on every refresh
    pub ttl_seconds: u64,

    /// Moment the record stops being valid
    pub expires_at: Instant,
}

impl TokenRecord {
    /// Rejects lifetimes that no backend can store as a valid record
    pub fn check_ttl(ttl_seconds: u64) -> TokenResult<()> {
        if ttl_seconds == 0 || ttl_seconds > MAX_TTL_SECONDS {
            return Err(TokenError::InvalidTtl { ttl_seconds });
        }
        Ok(())
    }

    /// Creates a record that expires `ttl_seconds` from now
    pub fn new(payload: impl Into<String>, ttl_seconds: u64) -> Self {
        Self::issued_at(payload, ttl_seconds, Instant::now())
    }

    /// Creates a record as if it had been issued at `now`
    pub fn issued_at(payload: impl Into<String>, ttl_seconds: u64, now: Instant) -> Self {
        Self {
            payload: payload.into(),
            ttl_seconds,
            expires_at: expiry_from(now, ttl_seconds),
        }
    }

    /// Original lifetime as a `Duration`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        !self.is_valid_at(now)
    }

    /// Restarts the original window from `now`
    pub fn refresh_at(&mut self, now: Instant) {
        self.expires_at = expiry_from(now, self.ttl_seconds);
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

fn expiry_from(now: Instant, ttl_seconds: u64) -> Instant {
    now.checked_add(Duration::from_secs(ttl_seconds))
        .unwrap_or_else(|| now + FAR_FUTURE)
}
