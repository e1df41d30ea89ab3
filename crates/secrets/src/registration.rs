//! Registration of secrets layers on a [`ConfigurationBuilder`]

use crate::exception::{DefaultExceptionHandler, ExceptionHandler};
use crate::source::SecretsSource;
use secretconf_config::ConfigurationBuilder;
use secretconf_core::Result;
use tracing::debug;

/// Secrets-specific operations on a [`ConfigurationBuilder`].
pub trait ConfigurationBuilderExt: Sized {
    /// Validate `source` and append it as the next configuration layer.
    ///
    /// Invalid settings are reported here, before anything is fetched.
    fn add_secrets_source(self, source: SecretsSource) -> Result<Self>;

    /// Build a source through `configure`, then register it
    fn add_secrets_with<F>(self, configure: F) -> Result<Self>
    where
        F: FnOnce(&mut SecretsSource),
    {
        let mut source = SecretsSource::new();
        configure(&mut source);
        self.add_secrets_source(source)
    }

    /// Handler for every secrets source registered without one of its own.
    ///
    /// Replaces any previously set default.
    fn set_default_exception_handler(&mut self, handler: ExceptionHandler);

    /// The handler set by [`set_default_exception_handler`](Self::set_default_exception_handler)
    fn default_exception_handler(&self) -> Option<ExceptionHandler>;
}

impl ConfigurationBuilderExt for ConfigurationBuilder {
    fn add_secrets_source(self, source: SecretsSource) -> Result<Self> {
        source.validate()?;
        debug!(
            secrets = source.secrets().len(),
            reload_interval = ?source.reload_interval(),
            "Registering secrets source"
        );
        Ok(self.add_source(source))
    }

    fn set_default_exception_handler(&mut self, handler: ExceptionHandler) {
        self.properties_mut()
            .insert(DefaultExceptionHandler(handler));
    }

    fn default_exception_handler(&self) -> Option<ExceptionHandler> {
        self.properties()
            .get::<DefaultExceptionHandler>()
            .map(|default| default.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ReverseSecret;
    use crate::exception::{exception_handler, ignore_failures};
    use secretconf_core::Error;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_default_handler_round_trips_same_reference() {
        let mut builder = ConfigurationBuilder::new();
        assert!(builder.default_exception_handler().is_none());

        let handler = ignore_failures();
        builder.set_default_exception_handler(handler.clone());

        let stored = builder.default_exception_handler().unwrap();
        assert!(Arc::ptr_eq(&stored, &handler));
    }

    #[test]
    fn test_last_default_handler_wins() {
        let mut builder = ConfigurationBuilder::new();
        let first = ignore_failures();
        let second = exception_handler(|context| context.omit());

        builder.set_default_exception_handler(first.clone());
        builder.set_default_exception_handler(second.clone());

        let stored = builder.default_exception_handler().unwrap();
        assert!(Arc::ptr_eq(&stored, &second));
        assert!(!Arc::ptr_eq(&stored, &first));
    }

    #[test]
    fn test_invalid_source_is_rejected_at_registration() {
        let result = ConfigurationBuilder::new().add_secrets_with(|source| {
            source
                .add_secret(ReverseSecret::new("a", "1"))
                .set_reload_interval(Duration::ZERO);
        });

        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_registration_appends_a_layer() {
        let builder = ConfigurationBuilder::new()
            .add_secrets_with(|source| {
                source.add_secret(ReverseSecret::new("a", "1"));
            })
            .unwrap();
        assert_eq!(builder.source_count(), 1);
    }
}
