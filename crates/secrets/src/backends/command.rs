use crate::Secret;
use async_trait::async_trait;
use secretconf_core::{Error, Result};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Secret produced by an external command's standard output.
///
/// Useful for local secret CLIs, e.g. `op read op://vault/item/field`.
/// Trailing whitespace is trimmed from the output.
#[derive(Debug, Clone)]
pub struct CommandSecret {
    key: String,
    cmd: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandSecret {
    pub fn new<I, A>(key: impl Into<String>, cmd: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            key: key.into(),
            cmd: cmd.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }

    /// Fail the retrieval if the command runs longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn execute(&self) -> Result<String> {
        let mut command = Command::new(&self.cmd);
        command.args(&self.args).kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| Error::timeout(format!("command '{}'", self.cmd), limit))?,
            None => command.output().await,
        }
        .map_err(|e| {
            Error::command_execution(
                &self.cmd,
                self.args.clone(),
                format!("failed to execute command: {e}"),
                None,
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::command_execution(
                &self.cmd,
                self.args.clone(),
                format!("command failed: {}", stderr.trim()),
                output.status.code(),
            ));
        }

        String::from_utf8(output.stdout)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| Error::configuration(format!("command output is not valid UTF-8: {e}")))
    }
}

#[async_trait]
impl Secret for CommandSecret {
    fn key(&self) -> &str {
        &self.key
    }

    async fn value(&self) -> Result<String> {
        debug!(key = %self.key, command = %self.cmd, "Running secret command");
        self.execute().await.map_err(|e| {
            Error::secret_retrieval_with_source(&self.key, "secret command did not succeed", e)
        })
    }
}
