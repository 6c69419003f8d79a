use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;
use governor::clock::{Clock, DefaultClock, Reference};
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;

use super::{RateLimitConfig, RateLimitDecision, RateLimiter};

type DirectLimiter<C> = governor::RateLimiter<
    NotKeyed,
    InMemoryState,
    C,
    governor::middleware::NoOpMiddleware<<C as Clock>::Instant>,
>;

/// Token bucket for one client key.
struct Bucket<C: Clock> {
    limiter: DirectLimiter<C>,
    /// Last access time (for cleanup)
    last_access: C::Instant,
}

/// Token-bucket limiter holding one governor bucket per key in memory.
///
/// Idle buckets are swept lazily, at most once per TTL, during checks; call
/// [`evict_expired`](Self::evict_expired) to sweep on demand.
pub struct InMemoryRateLimiter<C: Clock = DefaultClock> {
    config: RateLimitConfig,
    quota: Quota,
    clock: C,
    buckets: DashMap<String, Bucket<C>>,
    last_sweep: Mutex<C::Instant>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, DefaultClock::default())
    }
}

impl<C: Clock> InMemoryRateLimiter<C> {
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        let quota = quota(&config);
        let now = clock.now();
        Self {
            config,
            quota,
            clock,
            buckets: DashMap::new(),
            last_sweep: Mutex::new(now),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Drop buckets idle for longer than the TTL. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        if let Ok(mut last_sweep) = self.last_sweep.lock() {
            *last_sweep = now;
        }
        self.evict_idle(now)
    }

    /// Number of live buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn sweep_if_due(&self, now: C::Instant) {
        // Another thread holding the lock is already sweeping.
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if elapsed(now, *last_sweep) < self.config.idle_ttl() {
            return;
        }
        *last_sweep = now;
        drop(last_sweep);
        self.evict_idle(now);
    }

    fn evict_idle(&self, now: C::Instant) -> usize {
        let ttl = self.config.idle_ttl();
        let before = self.buckets.len();
        self.buckets.retain(|key, bucket| {
            let idle = elapsed(now, bucket.last_access);
            if idle >= ttl {
                tracing::debug!(client = %key, idle_secs = idle.as_secs(), "dropping idle rate limit bucket");
                false
            } else {
                true
            }
        });
        before.saturating_sub(self.buckets.len())
    }
}

impl<C> RateLimiter for InMemoryRateLimiter<C>
where
    C: Clock + Send + Sync,
    C::Instant: Send + Sync,
{
    fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        self.sweep_if_due(now);

        let mut bucket = self.buckets.entry(key.to_string()).or_insert_with(|| {
            tracing::debug!(client = key, "new rate limit bucket");
            Bucket {
                limiter: DirectLimiter::direct_with_clock(self.quota, &self.clock),
                last_access: now,
            }
        });
        bucket.last_access = now;

        match bucket.limiter.check() {
            Ok(()) => RateLimitDecision::Allowed,
            Err(not_until) => RateLimitDecision::Limited {
                retry_after: whole_seconds(not_until.wait_time_from(now)),
            },
        }
    }
}

/// `max_requests` burst, one request replenished every `window / max_requests`.
fn quota(config: &RateLimitConfig) -> Quota {
    let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
    config
        .window()
        .checked_div(burst.get())
        .and_then(Quota::with_period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}

fn elapsed<I: Reference>(now: I, earlier: I) -> Duration {
    Duration::from(now.duration_since(earlier))
}

/// Round up so a client never retries early; never less than one second.
fn whole_seconds(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
