//! Throttling policies for text generation calls.
//!
//! Time is read from tokio's clock, so tests can pause and advance it
//! deterministically.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::domain::models::{RateLimitConfig, ThrottleStrategy};
use crate::domain::ports::{RateLimitPolicy, Unthrottled};

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket rate limiter for API request throttling
///
/// Tokens refill continuously at `refill_rate` per second up to
/// `capacity`. Clones share the same bucket.
#[derive(Debug, Clone)]
pub struct TokenBucketRateLimiter {
    bucket: Arc<Mutex<Bucket>>,
    capacity: f64,
    refill_rate: f64,
}

impl TokenBucketRateLimiter {
    /// Create a rate limiter starting with a full bucket.
    ///
    /// # Arguments
    /// * `requests_per_second` - Sustained request rate (refill rate)
    /// * `burst_size` - Bucket capacity
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        assert!(requests_per_second > 0.0, "Rate limit must be positive");
        let capacity = f64::from(burst_size.max(1));

        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            })),
            capacity,
            refill_rate: requests_per_second,
        }
    }

    /// Acquire a token from the bucket, waiting if necessary
    pub async fn acquire(&self) {
        loop {
            let mut bucket = self.bucket.lock().await;

            let now = Instant::now();
            let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
            let tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.capacity);

            if tokens >= 1.0 {
                bucket.tokens = tokens - 1.0;
                bucket.last_refill = now;
                return;
            }

            let wait = Duration::from_secs_f64((1.0 - tokens) / self.refill_rate);
            drop(bucket);

            debug!(wait_ms = wait.as_millis(), "rate limit reached, waiting for token");
            sleep(wait).await;
        }
    }

    /// Current number of available tokens (for testing/monitoring)
    pub async fn available_tokens(&self) -> f64 {
        let bucket = self.bucket.lock().await;
        let elapsed = Instant::now().duration_since(bucket.last_refill).as_secs_f64();
        (bucket.tokens + elapsed * self.refill_rate).min(self.capacity)
    }
}

#[async_trait]
impl RateLimitPolicy for TokenBucketRateLimiter {
    async fn before_call(&self) {
        self.acquire().await;
    }
}

/// Unconditional sleep after every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RateLimitPolicy for FixedDelay {
    async fn after_call(&self) {
        sleep(self.delay).await;
    }
}

/// Build the policy selected by `config`.
pub fn from_config(config: &RateLimitConfig) -> Arc<dyn RateLimitPolicy> {
    match config.strategy {
        ThrottleStrategy::TokenBucket => Arc::new(TokenBucketRateLimiter::new(
            config.requests_per_second,
            config.burst_size,
        )),
        ThrottleStrategy::FixedDelay => {
            Arc::new(FixedDelay::new(Duration::from_millis(config.min_delay_ms)))
        }
        ThrottleStrategy::None => Arc::new(Unthrottled),
    }
}
