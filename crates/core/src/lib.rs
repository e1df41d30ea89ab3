//! Core domain types, errors, and constants shared by the secretconf crates.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all failure modes from argument validation to secret
//!   retrieval.
//! - **`types`**: The `Snapshot` mapping that configuration providers publish.
//! - **`constants`**: Shared constants such as the key delimiter and the
//!   default reload interval.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
