//! Error handling module for Guardplane
//!
//! This module provides the error types and utilities shared across the
//! policy and guardrail configuration engine.

mod error;

// Re-export the main error types and utilities
pub use error::{ConsoleError, Result};
