//! Secret-backed configuration layers
//!
//! A [`SecretsSource`] lists [`Secret`]s to poll. Registered on a
//! [`ConfigurationBuilder`](secretconf_config::ConfigurationBuilder) through
//! [`ConfigurationBuilderExt`], it becomes a [`SecretsProvider`] that loads
//! every secret before the configuration is handed out, then refreshes on a
//! timer. Individual retrieval failures go through an [`ExceptionHandler`]:
//! the source's own, else the builder default, else the cycle fails and the
//! previous values stay in effect.
//!
//! ```no_run
//! use secretconf_config::ConfigurationBuilder;
//! use secretconf_secrets::backends::ReverseSecret;
//! use secretconf_secrets::{log_and_ignore, ConfigurationBuilderExt};
//! use std::time::Duration;
//!
//! # async fn run() -> secretconf_core::Result<()> {
//! let mut builder = ConfigurationBuilder::new();
//! builder.set_default_exception_handler(log_and_ignore());
//!
//! let config = builder
//!     .add_secrets_with(|source| {
//!         source
//!             .add_secret(ReverseSecret::new("Greeting", "olleh"))
//!             .set_reload_interval(Duration::from_secs(60));
//!     })?
//!     .build()
//!     .await?;
//!
//! assert_eq!(config.get("Greeting").as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod exception;
pub mod provider;
pub mod registration;
pub mod secret;
pub mod source;

pub use exception::{
    exception_handler, ignore_failures, log_and_ignore, DefaultExceptionHandler,
    ExceptionContext, ExceptionHandler, FailureResolution,
};
pub use provider::{ProviderState, SecretsProvider};
pub use registration::ConfigurationBuilderExt;
pub use secret::{Secret, SharedSecret};
pub use source::{replace_separator, KeyMapper, SecretsSource};
