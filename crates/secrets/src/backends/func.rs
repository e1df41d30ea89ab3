use crate::Secret;
use async_trait::async_trait;
use secretconf_core::Result;
use std::fmt;

/// Secret whose value comes from a closure.
pub struct FnSecret<F> {
    key: String,
    fetch: F,
}

impl<F> FnSecret<F>
where
    F: Fn() -> Result<String> + Send + Sync,
{
    pub fn new(key: impl Into<String>, fetch: F) -> Self {
        Self {
            key: key.into(),
            fetch,
        }
    }
}

impl<F> fmt::Debug for FnSecret<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSecret").field("key", &self.key).finish()
    }
}

#[async_trait]
impl<F> Secret for FnSecret<F>
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    async fn value(&self) -> Result<String> {
        (self.fetch)()
    }
}
