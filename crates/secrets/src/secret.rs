//! The capability every secret backend implements

use async_trait::async_trait;
use secretconf_core::Result;
use std::fmt;
use std::sync::Arc;

/// A named value fetched on demand from some secret store.
///
/// `key` is stable for the lifetime of the secret. `value` performs the
/// backing call each time it is invoked; every kind of failure (unreachable
/// store, missing entry, malformed payload) is reported as
/// [`Error::SecretRetrieval`](secretconf_core::Error::SecretRetrieval).
#[async_trait]
pub trait Secret: Send + Sync {
    /// Identifier of the secret in its store
    fn key(&self) -> &str;

    /// Fetch the current value
    async fn value(&self) -> Result<String>;
}

/// Shared handle to a secret of any backend
pub type SharedSecret = Arc<dyn Secret>;

#[async_trait]
impl<S> Secret for Arc<S>
where
    S: Secret + ?Sized,
{
    fn key(&self) -> &str {
        (**self).key()
    }

    async fn value(&self) -> Result<String> {
        (**self).value().await
    }
}

impl fmt::Debug for dyn Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret").field("key", &self.key()).finish()
    }
}
