//! Assembles configuration layers into a [`ConfigurationRoot`]

use crate::{ConfigurationProvider, ConfigurationRoot, ConfigurationSource, Properties};
use secretconf_core::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered list of configuration sources plus the property bag they share.
///
/// Sources added later override keys from sources added earlier.
#[derive(Default)]
pub struct ConfigurationBuilder {
    sources: Vec<Box<dyn ConfigurationSource>>,
    properties: Properties,
}

impl ConfigurationBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source as the highest-precedence layer so far
    #[must_use]
    pub fn add_source(mut self, source: impl ConfigurationSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of registered sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Shared properties visible to every source at build time
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Mutable access to the shared properties
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Build every provider and load each one, in registration order.
    ///
    /// The root is only returned once all layers have loaded, so readers never
    /// observe a layer that has not fetched its values yet.
    pub async fn build(&self) -> Result<ConfigurationRoot> {
        let providers = self
            .sources
            .iter()
            .map(|source| source.build(self))
            .collect::<Result<Vec<Arc<dyn ConfigurationProvider>>>>()?;

        for provider in &providers {
            debug!(provider = %provider.name(), "Loading configuration layer");
            provider.load().await?;
        }

        info!(layers = providers.len(), "Configuration built");
        Ok(ConfigurationRoot::new(providers))
    }
}

impl fmt::Debug for ConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationBuilder")
            .field("sources", &self.sources.len())
            .field("properties", &self.properties)
            .finish()
    }
}
