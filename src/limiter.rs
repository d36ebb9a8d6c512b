// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Token bucket rate limiter for outbound tracker calls.
//!
//! Each tracker gets its own bucket so a busy redacted key never starves
//! ops (or the other way round). A check never waits: if the bucket is
//! empty the caller is told so immediately.

use crate::indexer::Indexer;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Capacity and refill window of one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketConfig {
    /// Tokens available at once, and tokens regained per window.
    pub tokens: u32,
    /// Time to refill an empty bucket completely.
    pub window: Duration,
}

/// Per-tracker limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    pub redacted: BucketConfig,
    pub ops: BucketConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            redacted: BucketConfig {
                tokens: 10,
                window: Duration::from_secs(10),
            },
            ops: BucketConfig {
                tokens: 5,
                window: Duration::from_secs(10),
            },
        }
    }
}

impl RateLimitConfig {
    pub fn for_indexer(&self, indexer: Indexer) -> BucketConfig {
        match indexer {
            Indexer::Redacted => self.redacted,
            Indexer::Ops => self.ops,
        }
    }
}

/// Token bucket for rate limiting.
#[derive(Debug)]
struct TokenBucket {
    /// Available tokens
    tokens: f64,
    /// Maximum tokens (bucket capacity)
    max_tokens: f64,
    /// Token refill rate per second
    refill_rate: f64,
    /// Last time tokens were refilled
    last_refill: Instant,
}

impl TokenBucket {
    fn new(config: BucketConfig) -> Self {
        let max_tokens = config.tokens as f64;
        let window = config.window.as_secs_f64();
        let refill_rate = if window > 0.0 { max_tokens / window } else { f64::INFINITY };

        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }

    /// Try to consume a token. Returns true if successful.
    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn remaining(&self) -> u32 {
        self.tokens.floor() as u32
    }
}

/// One bucket per tracker, shared by every evaluation in the process.
pub struct RateLimiter {
    redacted: Mutex<TokenBucket>,
    ops: Mutex<TokenBucket>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            redacted: Mutex::new(TokenBucket::new(config.redacted)),
            ops: Mutex::new(TokenBucket::new(config.ops)),
        }
    }

    fn bucket(&self, indexer: Indexer) -> &Mutex<TokenBucket> {
        match indexer {
            Indexer::Redacted => &self.redacted,
            Indexer::Ops => &self.ops,
        }
    }

    /// Take one token for `indexer` if one is available.
    pub async fn allow(&self, indexer: Indexer) -> bool {
        let mut bucket = self.bucket(indexer).lock().await;
        if bucket.try_consume() {
            debug!(%indexer, remaining = bucket.remaining(), "Rate limit token taken");
            true
        } else {
            warn!(%indexer, "Too many requests; outbound call refused");
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
