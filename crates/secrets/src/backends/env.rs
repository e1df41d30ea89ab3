use crate::Secret;
use async_trait::async_trait;
use secretconf_core::{Error, Result};
use std::env::VarError;

/// Secret read from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    key: String,
    variable: String,
}

impl EnvSecret {
    /// Read `variable` and publish it under `key`
    pub fn new(key: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            variable: variable.into(),
        }
    }

    /// Name of the environment variable backing this secret
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

#[async_trait]
impl Secret for EnvSecret {
    fn key(&self) -> &str {
        &self.key
    }

    async fn value(&self) -> Result<String> {
        std::env::var(&self.variable).map_err(|e| match e {
            VarError::NotPresent => Error::secret_retrieval(
                &self.key,
                format!("environment variable '{}' is not set", self.variable),
            ),
            VarError::NotUnicode(_) => Error::secret_retrieval_with_source(
                &self.key,
                format!("environment variable '{}' is not valid UTF-8", self.variable),
                e,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_reads_variable() {
        std::env::set_var("SECRETCONF_TEST_TOKEN", "s3cr3t");
        let secret = EnvSecret::new("Api:Token", "SECRETCONF_TEST_TOKEN");

        assert_eq!(secret.value().await.unwrap(), "s3cr3t");
        std::env::remove_var("SECRETCONF_TEST_TOKEN");
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_variable_is_retrieval_error() {
        std::env::remove_var("SECRETCONF_TEST_MISSING");
        let secret = EnvSecret::new("Api:Token", "SECRETCONF_TEST_MISSING");

        let err = secret.value().await.unwrap_err();
        assert!(matches!(err, Error::SecretRetrieval { .. }));
        assert!(err.to_string().contains("SECRETCONF_TEST_MISSING"));
    }
}
