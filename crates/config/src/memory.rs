//! In-memory configuration layer

use crate::{ConfigurationBuilder, ConfigurationProvider, ConfigurationSource};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use secretconf_core::{Result, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;

/// Registers a fixed set of key/value pairs as a layer.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    values: Snapshot,
}

impl MemorySource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = self.values.into_inner();
        values.insert(key.into(), value.into());
        Self {
            values: Snapshot::from_map(values),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for MemorySource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl ConfigurationSource for MemorySource {
    fn build(&self, _builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        Ok(Arc::new(MemoryProvider::new(self.values.clone())))
    }
}

/// Layer backed by an in-process map that can be updated at runtime.
pub struct MemoryProvider {
    values: ArcSwap<Snapshot>,
    changes: watch::Sender<u64>,
}

impl MemoryProvider {
    /// Create a provider holding `values`
    pub fn new(values: Snapshot) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            values: ArcSwap::from_pointee(values),
            changes,
        }
    }

    /// Set one key, publishing a new snapshot
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.values.rcu(|current| {
            let mut next = (**current).clone().into_inner();
            next.insert(key.clone(), value.clone());
            Snapshot::from_map(next)
        });
        self.changes.send_modify(|generation| *generation += 1);
    }
}

#[async_trait]
impl ConfigurationProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<()> {
        Ok(())
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.values.load_full()
    }

    fn subscribe(&self) -> Option<watch::Receiver<u64>> {
        Some(self.changes.subscribe())
    }
}
