use crate::{Secret, SharedSecret};
use async_trait::async_trait;
use secretconf_core::{Error, Result, KEY_DELIMITER};
use serde_json::Value;

/// Extracts one field from a secret whose value is a JSON object.
///
/// Stores commonly keep related values together, e.g.
/// `{"username": "app", "password": "..."}`. The field path uses the
/// configuration key delimiter for nesting (`connection:password`), and the
/// published key defaults to `<inner key>:<field path>`.
#[derive(Debug, Clone)]
pub struct JsonFieldSecret {
    key: String,
    inner: SharedSecret,
    path: String,
}

impl JsonFieldSecret {
    /// Select `path` from the JSON value of `inner`.
    ///
    /// Path segments are split on `:`, so a field whose own name contains
    /// `:` cannot be selected.
    pub fn new(inner: SharedSecret, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            key: format!("{}{KEY_DELIMITER}{path}", inner.key()),
            inner,
            path,
        }
    }

    /// Publish under `key` instead of the derived one
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn extract(&self, raw: &str) -> Result<String> {
        let document: Value = serde_json::from_str(raw).map_err(|e| {
            Error::secret_retrieval_with_source(&self.key, "secret value is not valid JSON", e)
        })?;

        let field = self
            .path
            .split(KEY_DELIMITER)
            .try_fold(&document, |node, segment| node.get(segment))
            .ok_or_else(|| {
                Error::secret_retrieval(&self.key, format!("field '{}' not found", self.path))
            })?;

        match field {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Err(Error::secret_retrieval(
                &self.key,
                format!("field '{}' is null", self.path),
            )),
            Value::Array(_) | Value::Object(_) => Err(Error::secret_retrieval(
                &self.key,
                format!("field '{}' is not a scalar value", self.path),
            )),
        }
    }
}

#[async_trait]
impl Secret for JsonFieldSecret {
    fn key(&self) -> &str {
        &self.key
    }

    async fn value(&self) -> Result<String> {
        let raw = self.inner.value().await?;
        self.extract(&raw)
    }
}
