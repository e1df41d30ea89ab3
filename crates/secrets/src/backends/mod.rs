//! Secret backends that ship with secretconf
//!
//! Cloud vendor stores live in their own crates and only need to implement
//! [`Secret`](crate::Secret). The backends here cover local use:
//!
//! - **`command`**: runs a CLI such as `op`, `aws` or `gcloud` and takes its stdout
//! - **`env`**: reads one process environment variable
//! - **`func`**: wraps a closure
//! - **`json`**: picks one field out of a secret holding a JSON object
//! - **`reverse`**: reverses a fixed string, for demos and tests

pub mod command;
pub mod env;
pub mod func;
pub mod json;
pub mod reverse;

pub use command::CommandSecret;
pub use env::EnvSecret;
pub use func::FnSecret;
pub use json::JsonFieldSecret;
pub use reverse::ReverseSecret;
