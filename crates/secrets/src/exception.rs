//! Exception policy applied when a secret cannot be retrieved

use crate::Secret;
use secretconf_core::Error;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Callback deciding what happens to a failed retrieval.
///
/// A handler that leaves the context untouched lets the failure propagate and
/// abort the refresh cycle.
pub type ExceptionHandler = Arc<dyn Fn(&mut ExceptionContext<'_>) + Send + Sync>;

/// Wrap a closure as an [`ExceptionHandler`]
pub fn exception_handler<F>(handler: F) -> ExceptionHandler
where
    F: Fn(&mut ExceptionContext<'_>) + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Handler that suppresses every failure and keeps the previous value
pub fn ignore_failures() -> ExceptionHandler {
    exception_handler(|context| context.set_handled(true))
}

/// Handler that logs every failure at warn level, then suppresses it
pub fn log_and_ignore() -> ExceptionHandler {
    exception_handler(|context| {
        warn!(
            key = %context.key(),
            secret = %context.secret().key(),
            error = %context.error(),
            "Failed to retrieve secret; keeping previous value"
        );
        context.set_handled(true);
    })
}

/// Outcome of a failed retrieval once the handler has run
#[derive(Clone, PartialEq, Eq)]
pub enum FailureResolution {
    /// Abort the cycle; the previous snapshot stays in effect
    Propagate,
    /// Carry over the value from the previous snapshot, if there is one
    KeepPrevious,
    /// Publish this value instead
    Substitute(String),
    /// Leave the key out of the new snapshot
    Omit,
}

// Substituted values are secrets; keep them out of logs.
impl fmt::Debug for FailureResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureResolution::Propagate => f.write_str("Propagate"),
            FailureResolution::KeepPrevious => f.write_str("KeepPrevious"),
            FailureResolution::Substitute(_) => f.write_str("Substitute(..)"),
            FailureResolution::Omit => f.write_str("Omit"),
        }
    }
}

/// Everything a handler needs to know about one failed retrieval.
pub struct ExceptionContext<'a> {
    secret: &'a dyn Secret,
    key: &'a str,
    error: &'a Error,
    previous: Option<&'a str>,
    resolution: FailureResolution,
}

impl<'a> ExceptionContext<'a> {
    pub(crate) fn new(
        secret: &'a dyn Secret,
        key: &'a str,
        error: &'a Error,
        previous: Option<&'a str>,
    ) -> Self {
        Self {
            secret,
            key,
            error,
            previous,
            resolution: FailureResolution::Propagate,
        }
    }

    /// The secret whose retrieval failed
    pub fn secret(&self) -> &dyn Secret {
        self.secret
    }

    /// Configuration key the value would have been published under
    pub fn key(&self) -> &str {
        self.key
    }

    /// Why the retrieval failed
    pub fn error(&self) -> &Error {
        self.error
    }

    /// Value published for this key by the last successful cycle
    pub fn previous_value(&self) -> Option<&str> {
        self.previous
    }

    pub fn is_handled(&self) -> bool {
        self.resolution != FailureResolution::Propagate
    }

    /// Mark the failure handled (keeping the previous value) or unhandled.
    ///
    /// Marking an already substituted or omitted failure handled again keeps
    /// that decision.
    pub fn set_handled(&mut self, handled: bool) {
        if !handled {
            self.resolution = FailureResolution::Propagate;
        } else if self.resolution == FailureResolution::Propagate {
            self.resolution = FailureResolution::KeepPrevious;
        }
    }

    /// Publish `value` for this key and mark the failure handled
    pub fn substitute(&mut self, value: impl Into<String>) {
        self.resolution = FailureResolution::Substitute(value.into());
    }

    /// Drop this key from the new snapshot and mark the failure handled
    pub fn omit(&mut self) {
        self.resolution = FailureResolution::Omit;
    }

    pub fn resolution(&self) -> &FailureResolution {
        &self.resolution
    }

    pub(crate) fn into_resolution(self) -> FailureResolution {
        self.resolution
    }
}

impl fmt::Debug for ExceptionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionContext")
            .field("key", &self.key)
            .field("error", &self.error)
            .field("has_previous", &self.previous.is_some())
            .field("resolution", &self.resolution)
            .finish()
    }
}

/// Builder property holding the handler used by sources without their own.
#[derive(Clone)]
pub struct DefaultExceptionHandler(pub ExceptionHandler);

impl fmt::Debug for DefaultExceptionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultExceptionHandler(..)")
    }
}
