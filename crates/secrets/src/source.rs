//! Registration-time description of a secrets layer

use crate::exception::{DefaultExceptionHandler, ExceptionHandler};
use crate::provider::SecretsProvider;
use crate::{Secret, SharedSecret};
use secretconf_config::{ConfigurationBuilder, ConfigurationProvider, ConfigurationSource};
use secretconf_core::{Error, Result, DEFAULT_RELOAD_INTERVAL, KEY_DELIMITER};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Maps a secret identifier to the configuration key it is published under
pub type KeyMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Key mapper turning a store-specific separator into the key delimiter.
///
/// Stores often forbid `:` in names, so `Database--Password` with `--`
/// becomes `Database:Password`.
pub fn replace_separator(separator: impl Into<String>) -> KeyMapper {
    let separator = separator.into();
    Arc::new(move |name: &str| name.replace(separator.as_str(), KEY_DELIMITER))
}

/// The secrets to poll and how to poll them.
///
/// Secrets are refreshed in the order they were added. Several secrets may
/// map to the same key; the one added last wins.
#[derive(Clone, Default)]
pub struct SecretsSource {
    pub(crate) secrets: Vec<SharedSecret>,
    pub(crate) reload_interval: Option<Duration>,
    pub(crate) exception_handler: Option<ExceptionHandler>,
    pub(crate) key_mapper: Option<KeyMapper>,
}

impl SecretsSource {
    /// Create a source with no secrets and no periodic refresh
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one secret
    pub fn add_secret(&mut self, secret: impl Secret + 'static) -> &mut Self {
        self.secrets.push(Arc::new(secret));
        self
    }

    /// Append secrets, keeping their order
    pub fn add_secrets<I>(&mut self, secrets: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedSecret>,
    {
        self.secrets.extend(secrets);
        self
    }

    /// Refresh every `interval` after the initial load
    pub fn set_reload_interval(&mut self, interval: Duration) -> &mut Self {
        self.reload_interval = Some(interval);
        self
    }

    /// Refresh on the default cadence of five minutes
    pub fn refresh_periodically(&mut self) -> &mut Self {
        self.set_reload_interval(DEFAULT_RELOAD_INTERVAL)
    }

    /// Handler used for this source instead of the builder default
    pub fn set_exception_handler(&mut self, handler: ExceptionHandler) -> &mut Self {
        self.exception_handler = Some(handler);
        self
    }

    /// Translate secret identifiers before publishing them
    pub fn set_key_mapper(&mut self, mapper: KeyMapper) -> &mut Self {
        self.key_mapper = Some(mapper);
        self
    }

    pub fn secrets(&self) -> &[SharedSecret] {
        &self.secrets
    }

    pub fn reload_interval(&self) -> Option<Duration> {
        self.reload_interval
    }

    pub fn exception_handler(&self) -> Option<&ExceptionHandler> {
        self.exception_handler.as_ref()
    }

    /// Reject settings that can never work.
    pub fn validate(&self) -> Result<()> {
        if self.reload_interval == Some(Duration::ZERO) {
            return Err(Error::invalid_argument(
                "reload_interval",
                "reload interval must be greater than zero",
            ));
        }

        if let Some(position) = self.secrets.iter().position(|s| s.key().is_empty()) {
            return Err(Error::invalid_argument(
                "secrets",
                format!("secret at position {position} has an empty key"),
            ));
        }

        Ok(())
    }

    /// Handler a provider built from this source should use
    pub(crate) fn effective_handler(
        &self,
        builder: &ConfigurationBuilder,
    ) -> Option<ExceptionHandler> {
        self.exception_handler.clone().or_else(|| {
            builder
                .properties()
                .get::<DefaultExceptionHandler>()
                .map(|default| default.0.clone())
        })
    }
}

impl ConfigurationSource for SecretsSource {
    fn build(&self, builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        self.validate()?;
        let handler = self.effective_handler(builder);
        Ok(Arc::new(SecretsProvider::with_handler(self, handler)))
    }
}

impl fmt::Debug for SecretsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.secrets.iter().map(|s| s.key()).collect();
        f.debug_struct("SecretsSource")
            .field("secrets", &keys)
            .field("reload_interval", &self.reload_interval)
            .field("exception_handler", &self.exception_handler.is_some())
            .field("key_mapper", &self.key_mapper.is_some())
            .finish()
    }
}
