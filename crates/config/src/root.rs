//! Layered read view over loaded providers

use crate::ConfigurationProvider;
use futures::future::select_all;
use secretconf_core::{Result, Snapshot, KEY_DELIMITER};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// The built configuration: a stack of providers read top-down.
pub struct ConfigurationRoot {
    providers: Vec<Arc<dyn ConfigurationProvider>>,
}

impl ConfigurationRoot {
    /// Wrap already-loaded providers, lowest precedence first
    pub fn new(providers: Vec<Arc<dyn ConfigurationProvider>>) -> Self {
        Self { providers }
    }

    /// Value from the highest-precedence layer that has `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.providers.iter().rev().find_map(|p| p.get(key))
    }

    /// Check whether any layer has `key`
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Merge every layer into one mapping, later layers overriding earlier ones.
    ///
    /// Each layer contributes a single published snapshot, so a refresh
    /// landing mid-merge never mixes two cycles of one layer.
    pub fn snapshot(&self) -> Snapshot {
        let mut merged = HashMap::new();
        for provider in &self.providers {
            let layer = provider.snapshot();
            merged.extend(
                layer
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
        }
        Snapshot::from_map(merged)
    }

    /// Entries below `name`, with the `name:` prefix removed
    pub fn section(&self, name: &str) -> Snapshot {
        let prefix = format!("{name}{KEY_DELIMITER}");
        self.snapshot()
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|child| (child.to_string(), value))
            })
            .collect()
    }

    /// The layers, lowest precedence first
    pub fn providers(&self) -> &[Arc<dyn ConfigurationProvider>] {
        &self.providers
    }

    /// Ask every layer to load again, stopping at the first failure
    pub async fn reload(&self) -> Result<()> {
        for provider in &self.providers {
            debug!(provider = %provider.name(), "Reloading configuration layer");
            provider.load().await?;
        }
        Ok(())
    }

    /// Listen for changes published by any layer
    pub fn subscribe(&self) -> ChangeListener {
        ChangeListener {
            receivers: self
                .providers
                .iter()
                .filter_map(|p| p.subscribe())
                .collect(),
        }
    }
}

impl fmt::Debug for ConfigurationRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ConfigurationRoot")
            .field("providers", &names)
            .finish()
    }
}

/// Waits for the next change published by any layer of a root.
pub struct ChangeListener {
    receivers: Vec<watch::Receiver<u64>>,
}

impl ChangeListener {
    /// Resolve once any layer publishes new data.
    ///
    /// Returns `false` when no layer can publish anymore.
    pub async fn changed(&mut self) -> bool {
        loop {
            if self.receivers.is_empty() {
                return false;
            }

            let (notified, index) = {
                let waits = self
                    .receivers
                    .iter_mut()
                    .map(|receiver| Box::pin(receiver.changed()));
                let (result, index, _pending) = select_all(waits).await;
                (result.is_ok(), index)
            };

            if notified {
                return true;
            }
            // Sender dropped: that layer is gone.
            self.receivers.remove(index);
        }
    }

    /// Number of layers being watched
    pub fn watched(&self) -> usize {
        self.receivers.len()
    }
}
