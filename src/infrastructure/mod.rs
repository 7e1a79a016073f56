//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Gemini API client
//! - Rate limiting policies
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod gemini;
pub mod logging;
pub mod rate_limiter;
