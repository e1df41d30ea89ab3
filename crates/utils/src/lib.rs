//! Shared utilities for the secretconf workspace
//!
//! Currently this is the tracing setup shared by binaries and test suites.

pub mod tracing;

pub use self::tracing::*;
