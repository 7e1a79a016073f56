//! Port trait definitions (Hexagonal Architecture)
//!
//! - `TextGenerator`: generative model access
//! - `RateLimitPolicy`: throttling around model calls

pub mod rate_limit;
pub mod text_generator;

pub use rate_limit::{RateLimitPolicy, Unthrottled};
pub use text_generator::{GenerationError, TextGenerator, UnconfiguredGenerator};
