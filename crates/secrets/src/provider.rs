//! Live snapshot of secret values with periodic refresh

use crate::exception::{ExceptionContext, ExceptionHandler, FailureResolution};
use crate::source::{KeyMapper, SecretsSource};
use crate::{Secret, SharedSecret};
use arc_swap::{ArcSwap, ArcSwapOption};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use secretconf_config::ConfigurationProvider;
use secretconf_core::{Error, Result, Snapshot};
use secretconf_utils::refresh_span;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

const PROVIDER_NAME: &str = "secrets";

/// Lifecycle of a [`SecretsProvider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// Nothing has been fetched yet
    Uninitialized,
    /// The initial load is running
    Loading,
    /// A snapshot is published and no cycle is running
    Loaded,
    /// A refresh cycle is running on top of a published snapshot
    Refreshing,
}

/// Configuration layer holding the latest resolved secret values.
///
/// The first [`load`](ConfigurationProvider::load) fetches every secret
/// before returning. If the source has a reload interval, a background task
/// then refreshes on that cadence until [`stop`](SecretsProvider::stop) is
/// called or the provider is dropped.
pub struct SecretsProvider {
    inner: Arc<Inner>,
    reload_interval: Option<Duration>,
    refresher: Mutex<Option<CancellationToken>>,
}

struct Inner {
    secrets: Vec<SharedSecret>,
    handler: Option<ExceptionHandler>,
    key_mapper: Option<KeyMapper>,
    snapshot: ArcSwap<Snapshot>,
    state: RwLock<ProviderState>,
    changes: watch::Sender<u64>,
    // Serialises cycles so a manual load never interleaves with a timer tick.
    cycle: tokio::sync::Mutex<()>,
    last_error: ArcSwapOption<Error>,
}

impl SecretsProvider {
    /// Provider for `source`, using only the source's own exception handler
    pub fn new(source: &SecretsSource) -> Self {
        Self::with_handler(source, source.exception_handler.clone())
    }

    pub(crate) fn with_handler(source: &SecretsSource, handler: Option<ExceptionHandler>) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                secrets: source.secrets.clone(),
                handler,
                key_mapper: source.key_mapper.clone(),
                snapshot: ArcSwap::from_pointee(Snapshot::new()),
                state: RwLock::new(ProviderState::Uninitialized),
                changes,
                cycle: tokio::sync::Mutex::new(()),
                last_error: ArcSwapOption::empty(),
            }),
            reload_interval: source.reload_interval,
            refresher: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ProviderState {
        *self.inner.state.read()
    }

    /// Number of snapshots published so far
    pub fn generation(&self) -> u64 {
        *self.inner.changes.borrow()
    }

    /// Error from the most recent failed refresh after the initial load.
    ///
    /// Cleared by the next successful cycle.
    pub fn last_refresh_error(&self) -> Option<Arc<Error>> {
        self.inner.last_error.load_full()
    }

    /// Run one cycle now, performing the initial load if it has not happened
    pub async fn refresh(&self) -> Result<()> {
        ConfigurationProvider::load(self).await
    }

    /// Whether the background refresh task is running
    pub fn is_refreshing_periodically(&self) -> bool {
        self.refresher
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Stop the background refresh task; the current snapshot stays readable
    pub fn stop(&self) {
        if let Some(token) = self.refresher.lock().take() {
            token.cancel();
            debug!(provider = PROVIDER_NAME, "Stopped periodic secret refresh");
        }
    }

    fn start_refresh(&self) {
        let Some(period) = self.reload_interval else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                provider = PROVIDER_NAME,
                "No tokio runtime available; periodic secret refresh disabled"
            );
            return;
        };

        let token = CancellationToken::new();
        if let Some(previous) = self.refresher.lock().replace(token.clone()) {
            previous.cancel();
        }

        let inner = Arc::clone(&self.inner);
        runtime.spawn(inner.refresh_loop(period, token));
        info!(
            provider = PROVIDER_NAME,
            interval = ?period,
            "Started periodic secret refresh"
        );
    }
}

impl Inner {
    async fn refresh_loop(self: Arc<Self>, period: Duration, token: CancellationToken) {
        let mut ticks = interval_at(Instant::now() + period, period);
        // A slow backend pushes the next tick back instead of causing a burst.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticks.tick() => {
                    if let Err(error) = self.refresh().await {
                        warn!(
                            provider = PROVIDER_NAME,
                            error = %error,
                            "Background secret refresh failed; previous values remain in effect"
                        );
                        self.last_error.store(Some(Arc::new(error)));
                    }
                }
            }
        }
    }

    fn set_state(&self, state: ProviderState) {
        *self.state.write() = state;
    }

    /// Refresh on top of an already published snapshot
    async fn refresh(&self) -> Result<()> {
        let _cycle = self.cycle.lock().await;
        self.refresh_locked().await
    }

    /// Same as [`refresh`](Self::refresh); the caller holds the cycle lock
    async fn refresh_locked(&self) -> Result<()> {
        self.set_state(ProviderState::Refreshing);
        let result = self.run_cycle().await;
        self.set_state(ProviderState::Loaded);

        let count = result?;
        debug!(provider = PROVIDER_NAME, count, "Refreshed secrets");
        Ok(())
    }

    /// Fetch every secret and publish the result, or publish nothing at all.
    ///
    /// The caller holds the cycle lock.
    async fn run_cycle(&self) -> Result<usize> {
        let span = refresh_span(PROVIDER_NAME, self.secrets.len());

        async {
            let previous = self.snapshot.load_full();
            let mut staged = HashMap::with_capacity(self.secrets.len());

            for secret in &self.secrets {
                let key = self.map_key(secret.key());
                match secret.value().await {
                    Ok(value) => {
                        staged.insert(key, value);
                    }
                    Err(error) => {
                        let prior = previous.get(&key);
                        match self.resolve_failure(&**secret, &key, &error, prior) {
                            FailureResolution::Propagate => {
                                return Err(Error::unhandled_retrieval(secret.key(), error));
                            }
                            FailureResolution::KeepPrevious => {
                                // A value already fetched this cycle beats the published one.
                                if let Some(prior) = prior {
                                    staged.entry(key).or_insert_with(|| prior.to_string());
                                }
                            }
                            FailureResolution::Substitute(value) => {
                                staged.insert(key, value);
                            }
                            FailureResolution::Omit => {
                                staged.remove(&key);
                            }
                        }
                    }
                }
            }

            let count = staged.len();
            self.snapshot.store(Arc::new(Snapshot::from_map(staged)));
            self.last_error.store(None);
            self.changes.send_modify(|generation| *generation += 1);
            Ok(count)
        }
        .instrument(span)
        .await
    }

    fn resolve_failure(
        &self,
        secret: &dyn Secret,
        key: &str,
        error: &Error,
        previous: Option<&str>,
    ) -> FailureResolution {
        let Some(handler) = &self.handler else {
            return FailureResolution::Propagate;
        };

        let mut context = ExceptionContext::new(secret, key, error, previous);
        handler(&mut context);
        let resolution = context.into_resolution();

        if resolution != FailureResolution::Propagate {
            debug!(
                key = %key,
                error = %error,
                resolution = ?resolution,
                "Secret retrieval failure handled"
            );
        }
        resolution
    }

    fn map_key(&self, name: &str) -> String {
        match &self.key_mapper {
            Some(mapper) => mapper(name),
            None => name.to_string(),
        }
    }
}

#[async_trait]
impl ConfigurationProvider for SecretsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn load(&self) -> Result<()> {
        // A call queued behind a failed initial load becomes the initial load.
        let _cycle = self.inner.cycle.lock().await;
        if self.state() != ProviderState::Uninitialized {
            return self.inner.refresh_locked().await;
        }

        self.inner.set_state(ProviderState::Loading);
        match self.inner.run_cycle().await {
            Ok(count) => {
                self.inner.set_state(ProviderState::Loaded);
                info!(provider = PROVIDER_NAME, count, "Loaded secrets");
                self.start_refresh();
                Ok(())
            }
            Err(error) => {
                self.inner.set_state(ProviderState::Uninitialized);
                Err(error)
            }
        }
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.load_full()
    }

    fn subscribe(&self) -> Option<watch::Receiver<u64>> {
        Some(self.inner.changes.subscribe())
    }
}

impl Drop for SecretsProvider {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for SecretsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsProvider")
            .field("secrets", &self.inner.secrets.len())
            .field("state", &self.state())
            .field("reload_interval", &self.reload_interval)
            .field("snapshot", &self.inner.snapshot.load())
            .finish()
    }
}
