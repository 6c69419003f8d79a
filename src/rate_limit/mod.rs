//! Request rate limiting.
//!
//! The HTTP layer depends on the [`RateLimiter`] trait only, so a shared
//! backend can replace [`InMemoryRateLimiter`] when several instances serve
//! the same clients.

mod in_memory;

use std::time::Duration;

use serde::Deserialize;

pub use in_memory::InMemoryRateLimiter;

/// Per-client quota: `max_requests` per `window_secs`, replenished evenly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    /// Burst size, and requests allowed per window and key.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Buckets untouched for this long are evicted.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    /// Key clients on `x-forwarded-for` instead of the peer address. Only
    /// enable behind a proxy that sets the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

fn default_max_requests() -> u32 {
    120
}

fn default_window_secs() -> u64 {
    60
}

fn default_idle_ttl_secs() -> u64 {
    600
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            idle_ttl_secs: default_idle_ttl_secs(),
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration, idle_ttl: Duration) -> Self {
        Self {
            max_requests,
            window_secs: window.as_secs().max(1),
            idle_ttl_secs: idle_ttl.as_secs(),
            trust_forwarded_for: false,
        }
    }

    pub fn trusting_forwarded_for(mut self) -> Self {
        self.trust_forwarded_for = true;
        self
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs.max(1))
    }

    /// Never shorter than one window, so a bucket still refilling is kept.
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs).max(self.window())
    }

    pub fn client_key(&self) -> ClientKey {
        if self.trust_forwarded_for {
            ClientKey::ForwardedFor
        } else {
            ClientKey::PeerAddr
        }
    }
}

/// Which address identifies a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientKey {
    /// The TCP peer address.
    #[default]
    PeerAddr,
    /// The hop a trusted proxy appended to `x-forwarded-for`, falling back
    /// to the peer address.
    ForwardedFor,
}

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited {
        /// Whole seconds until the next request would be admitted.
        retry_after: u64,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Admission control keyed by client identity.
pub trait RateLimiter: Send + Sync {
    /// Count one request for `key` and decide whether it may proceed.
    fn check(&self, key: &str) -> RateLimitDecision;
}
