//! Process environment as a configuration layer

use crate::{ConfigurationBuilder, ConfigurationProvider, ConfigurationSource};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use secretconf_core::{Result, Snapshot, ENV_KEY_SEPARATOR, KEY_DELIMITER};
use std::sync::Arc;
use tracing::debug;

/// Reads process environment variables, optionally filtered by a prefix.
///
/// `APP_Database__Host` with prefix `APP_` becomes the key `Database:Host`.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    prefix: Option<String>,
}

impl EnvironmentSource {
    /// Read every environment variable
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read variables starting with `prefix`, stripping it from the key
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl ConfigurationSource for EnvironmentSource {
    fn build(&self, _builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        Ok(Arc::new(EnvironmentProvider {
            prefix: self.prefix.clone(),
            values: ArcSwap::from_pointee(Snapshot::new()),
        }))
    }
}

/// Provider created by [`EnvironmentSource`]
pub struct EnvironmentProvider {
    prefix: Option<String>,
    values: ArcSwap<Snapshot>,
}

/// Convert an environment variable name to a configuration key
pub fn env_name_to_key(name: &str) -> String {
    name.replace(ENV_KEY_SEPARATOR, KEY_DELIMITER)
}

#[async_trait]
impl ConfigurationProvider for EnvironmentProvider {
    fn name(&self) -> &str {
        "environment"
    }

    async fn load(&self) -> Result<()> {
        let prefix = self.prefix.as_deref().unwrap_or("");
        let values: Snapshot = std::env::vars()
            .filter_map(|(name, value)| {
                name.strip_prefix(prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (env_name_to_key(rest), value))
            })
            .collect();

        debug!(prefix = %prefix, count = values.len(), "Loaded environment variables");
        self.values.store(Arc::new(values));
        Ok(())
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.values.load_full()
    }
}
