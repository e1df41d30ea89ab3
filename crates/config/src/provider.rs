//! Contracts between the configuration root and the layers it reads from

use crate::ConfigurationBuilder;
use async_trait::async_trait;
use secretconf_core::{Result, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;

/// One layer of configuration values.
///
/// Reads are synchronous and must not perform I/O; any fetching happens in
/// [`load`](ConfigurationProvider::load) or in a provider-owned background
/// task.
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch values from the backing store.
    ///
    /// Called once by [`ConfigurationBuilder::build`] before the root is
    /// handed out, and again whenever the root is reloaded.
    async fn load(&self) -> Result<()>;

    /// The values this layer currently publishes, all from one load
    fn snapshot(&self) -> Arc<Snapshot>;

    /// Current value for `key`, if this layer has one
    fn get(&self, key: &str) -> Option<String> {
        self.snapshot().get(key).map(str::to_string)
    }

    /// Keys currently held by this layer
    fn keys(&self) -> Vec<String> {
        self.snapshot().keys().map(str::to_string).collect()
    }

    /// Change token: the value is bumped each time the layer publishes new data.
    ///
    /// Layers that never change return `None`.
    fn subscribe(&self) -> Option<watch::Receiver<u64>> {
        None
    }
}

/// Factory that turns a registration into a live provider.
pub trait ConfigurationSource: Send + Sync {
    /// Build the provider, reading shared state from the builder if needed
    fn build(&self, builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>>;
}
