//! Layered configuration host for secretconf
//!
//! A [`ConfigurationBuilder`] collects [`ConfigurationSource`]s in order,
//! builds a [`ConfigurationProvider`] from each, loads them all, and hands
//! back a [`ConfigurationRoot`] where later layers override earlier ones.
//! Sources that need shared settings read them from the builder's
//! [`Properties`].

pub mod builder;
pub mod environment;
pub mod memory;
pub mod properties;
pub mod provider;
pub mod root;

pub use builder::ConfigurationBuilder;
pub use environment::{EnvironmentProvider, EnvironmentSource};
pub use memory::{MemoryProvider, MemorySource};
pub use properties::Properties;
pub use provider::{ConfigurationProvider, ConfigurationSource};
pub use root::{ChangeListener, ConfigurationRoot};
