// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-client submission limiter.
//!
//! Each client identifier gets a window that opens on its first request and
//! lasts `window_secs`. Up to `max_requests` submissions are accepted inside
//! the window; the first request after the window has expired opens a fresh
//! one with a count of 1.

use crate::clock::Clock;
use crate::config::RateLimitConfig;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Reason for rate limiting
        reason: RateLimitReason,
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Reason for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitReason {
    /// Client used up its submissions for the current window
    WindowExhausted,
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowExhausted => write!(f, "Too many requests. Please try again later."),
        }
    }
}

/// Submissions seen from one client in its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.reset_at
    }
}

/// Thread-safe fixed-window rate limiter keyed by client identifier.
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Record a submission attempt for `identifier` and decide whether it may
    /// proceed.
    ///
    /// The lookup and the update happen under one write lock, so concurrent
    /// calls for the same identifier never admit more than `max_requests`
    /// per window.
    pub async fn check(&self, identifier: &str) -> RateLimitResult {
        let now = self.clock.now();
        let window = self.config.window_duration();
        let max = self.config.max_requests;

        let mut entries = self.entries.write().await;

        match entries.get_mut(identifier) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.count >= max {
                    let retry_after = until(now, entry.reset_at);
                    debug!(client = %identifier, ?retry_after, "Client rate limit exceeded");
                    return RateLimitResult::Limited {
                        reason: RateLimitReason::WindowExhausted,
                        retry_after,
                    };
                }

                entry.count += 1;
                RateLimitResult::Allowed {
                    remaining: max.saturating_sub(entry.count),
                    reset_in: until(now, entry.reset_at),
                }
            }
            _ => {
                let reset_at = chrono::Duration::from_std(window)
                    .ok()
                    .and_then(|w| now.checked_add_signed(w))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                entries.insert(
                    identifier.to_string(),
                    RateLimitEntry { count: 1, reset_at },
                );
                debug!(client = %identifier, %reset_at, "Opened rate limit window");
                RateLimitResult::Allowed {
                    remaining: max.saturating_sub(1),
                    reset_in: window,
                }
            }
        }
    }

    /// Drop every entry whose window has expired. Returns how many were
    /// removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Current entry for `identifier`, if any.
    pub async fn entry(&self, identifier: &str) -> Option<RateLimitEntry> {
        self.entries.read().await.get(identifier).copied()
    }
}

fn until(now: DateTime<Utc>, later: DateTime<Utc>) -> Duration {
    (later - now).to_std().unwrap_or(Duration::ZERO)
}
