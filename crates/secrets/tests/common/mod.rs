//! Common test utilities and helpers
//!
//! Scriptable secrets shared by the integration suites.
#![allow(dead_code)]

use async_trait::async_trait;
use secretconf_core::{Error, Result};
use secretconf_secrets::backends::FnSecret;
use secretconf_secrets::{Secret, SharedSecret};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Secret that always returns `value`
pub fn fixed(key: &str, value: &str) -> SharedSecret {
    let value = value.to_string();
    Arc::new(FnSecret::new(key, move || Ok(value.clone())))
}

/// Secret whose retrieval always fails
pub fn failing(key: &str) -> SharedSecret {
    let owned = key.to_string();
    Arc::new(FnSecret::new(key, move || {
        Err(Error::secret_retrieval(&owned, "store unreachable"))
    }))
}

/// Secret that can be switched between succeeding and failing, and whose
/// value can be changed between cycles.
pub struct ScriptedSecret {
    key: String,
    value: parking_lot::Mutex<String>,
    failing: AtomicBool,
    failures_left: AtomicUsize,
    latency: parking_lot::Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl ScriptedSecret {
    pub fn new(key: &str, value: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            value: parking_lot::Mutex::new(value.to_string()),
            failing: AtomicBool::new(false),
            failures_left: AtomicUsize::new(0),
            latency: parking_lot::Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_value(&self, value: &str) {
        *self.value.lock() = value.to_string();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail the next `times` retrievals, then behave normally again
    pub fn fail_times(&self, times: usize) {
        self.failures_left.store(times, Ordering::SeqCst);
    }

    /// Sleep for `latency` before answering
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self: &Arc<Self>) -> SharedSecret {
        self.clone()
    }
}

#[async_trait]
impl Secret for ScriptedSecret {
    fn key(&self) -> &str {
        &self.key
    }

    async fn value(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let scripted_failure = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if scripted_failure || self.failing.load(Ordering::SeqCst) {
            Err(Error::secret_retrieval(&self.key, "store unreachable"))
        } else {
            Ok(self.value.lock().clone())
        }
    }
}
