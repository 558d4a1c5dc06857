//! Fixed-window request limiter keyed by client address.
//!
//! Each client gets its own window which opens on its first request and
//! lasts [`RateLimitPolicy::window`]. Within a window at most
//! [`RateLimitPolicy::max_requests`] requests are admitted; the rest are
//! refused until the window closes. Closed windows are pruned lazily.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

/// Message returned to clients that exceed their allowance.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

const PRUNE_THRESHOLD: usize = 1024;

/// Size and duration of the per-client window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u32,
    window: TimeDelta,
}

impl RateLimitPolicy {
    /// Ten requests per fifteen minutes.
    pub const DEFAULT_MAX_REQUESTS: u32 = 10;
    /// Window length in seconds.
    pub const DEFAULT_WINDOW_SECS: u32 = 15 * 60;

    /// Policy admitting `max_requests` per `window_secs` seconds.
    pub fn new(max_requests: u32, window_secs: u32) -> Self {
        Self {
            max_requests,
            window: TimeDelta::seconds(i64::from(window_secs)),
        }
    }

    /// Requests admitted per window.
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Window length.
    pub fn window(&self) -> TimeDelta {
        self.window
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_REQUESTS, Self::DEFAULT_WINDOW_SECS)
    }
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The request may proceed.
    Allowed {
        /// Requests still available in the current window.
        remaining: u32,
    },
    /// The request is refused.
    Limited {
        /// Whole seconds until the window closes (at least one).
        retry_after_secs: u64,
    },
}

impl RateLimitDecision {
    /// Whether the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    opened_at: DateTime<Utc>,
    hits: u32,
}

/// Thread-safe fixed-window limiter.
pub struct FixedWindowRateLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowRateLimiter {
    /// Create a limiter reading time from `clock`.
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Configured policy.
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Record a request from `client` and decide whether to admit it.
    pub fn check(&self, client: IpAddr) -> RateLimitDecision {
        let now = self.clock.utc();
        let window_len = self.policy.window;
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|err| err.into_inner());

        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, window| now - window.opened_at < window_len);
        }

        let window = windows.entry(client).or_insert(Window {
            opened_at: now,
            hits: 0,
        });
        if now - window.opened_at >= window_len {
            *window = Window {
                opened_at: now,
                hits: 0,
            };
        }

        if window.hits >= self.policy.max_requests {
            let remaining = window_len - (now - window.opened_at);
            let retry_after_secs = u64::try_from(remaining.num_seconds()).unwrap_or(0).max(1);
            debug!(%client, retry_after_secs, "request refused by rate limiter");
            return RateLimitDecision::Limited { retry_after_secs };
        }

        window.hits += 1;
        RateLimitDecision::Allowed {
            remaining: self.policy.max_requests - window.hits,
        }
    }
}
