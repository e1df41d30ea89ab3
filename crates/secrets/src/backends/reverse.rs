use crate::Secret;
use async_trait::async_trait;
use secretconf_core::Result;

/// Demonstration backend whose value is its input reversed.
#[derive(Debug, Clone)]
pub struct ReverseSecret {
    key: String,
    input: String,
}

impl ReverseSecret {
    pub fn new(key: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            input: input.into(),
        }
    }
}

#[async_trait]
impl Secret for ReverseSecret {
    fn key(&self) -> &str {
        &self.key
    }

    async fn value(&self) -> Result<String> {
        Ok(self.input.chars().rev().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reverses_input() {
        let secret = ReverseSecret::new("greeting", "olleh");
        assert_eq!(secret.key(), "greeting");
        assert_eq!(secret.value().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_reverses_by_character() {
        let secret = ReverseSecret::new("k", "añb");
        assert_eq!(secret.value().await.unwrap(), "bña");
    }
}
