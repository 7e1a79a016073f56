//! Gemini API adapter
//!
//! HTTP client for Google's Generative Language API implementing the
//! `TextGenerator` port.

pub mod client;
pub mod errors;
pub mod types;

pub use client::{build_generator, GeminiClient, GeminiClientConfig};
pub use errors::GeminiApiError;
