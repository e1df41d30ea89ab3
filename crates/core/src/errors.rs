/// Result type alias for secretconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for secretconf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input supplied at a registration or construction call site
    #[error("invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// A secret's value could not be obtained from its backing store
    #[error("failed to retrieve secret '{key}': {message}")]
    SecretRetrieval {
        key: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A retrieval failure that no exception handler suppressed
    #[error("unhandled failure retrieving secret '{key}'")]
    UnhandledRetrieval {
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// Command execution errors
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Operation timeout errors
    #[error("operation '{operation}' timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },
}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    let invocation = if args_str.is_empty() {
        command.to_string()
    } else {
        format!("{command} {args_str}")
    };
    match exit_code {
        Some(code) => format!("command '{invocation}' failed with exit code {code}: {message}"),
        None => format!("command '{invocation}' failed: {message}"),
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Configuration {
            message: format!("An internal error occurred: {error}"),
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a secret retrieval error
    #[must_use]
    pub fn secret_retrieval(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SecretRetrieval {
            key: key.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a secret retrieval error with an underlying cause
    #[must_use]
    pub fn secret_retrieval_with_source(
        key: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::SecretRetrieval {
            key: key.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Wrap a retrieval failure that no handler suppressed
    #[must_use]
    pub fn unhandled_retrieval(key: impl Into<String>, source: Error) -> Self {
        Error::UnhandledRetrieval {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: std::time::Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether this error is a retrieval failure, wrapped or not
    #[must_use]
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            Error::SecretRetrieval { .. } | Error::UnhandledRetrieval { .. }
        )
    }

    /// Key of the secret involved, for retrieval failures
    #[must_use]
    pub fn secret_key(&self) -> Option<&str> {
        match self {
            Error::SecretRetrieval { key, .. } | Error::UnhandledRetrieval { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }
}
