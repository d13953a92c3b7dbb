//! The `utils` module provides shared utilities used across the crate.
//!
//! It contains the crate-wide error type and the tracing/logging setup.

pub mod error;
pub mod logging;
