//! Throttling port for calls to the text generation service.

use async_trait::async_trait;

/// Policy applied around every generation call.
///
/// `before_call` may wait for capacity; `after_call` may impose a cool-down.
/// Both default to no-ops.
#[async_trait]
pub trait RateLimitPolicy: Send + Sync {
    async fn before_call(&self) {}

    async fn after_call(&self) {}
}

/// No throttling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

#[async_trait]
impl RateLimitPolicy for Unthrottled {}
