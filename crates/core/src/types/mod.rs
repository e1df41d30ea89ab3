//! Core domain types for secretconf.
//!
//! - **`snapshot`**: the immutable key/value mapping providers publish

pub mod snapshot;

pub use snapshot::*;
