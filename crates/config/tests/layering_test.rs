use async_trait::async_trait;
use secretconf_config::{
    ConfigurationBuilder, ConfigurationProvider, ConfigurationSource, MemoryProvider, MemorySource,
};
use secretconf_core::{Error, Result, Snapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Layer whose load always fails
struct FailingSource;

struct FailingProvider;

impl ConfigurationSource for FailingSource {
    fn build(&self, _builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        Ok(Arc::new(FailingProvider))
    }
}

#[async_trait]
impl ConfigurationProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn load(&self) -> Result<()> {
        Err(Error::configuration("backing store offline"))
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::new(Snapshot::new())
    }
}

/// Source that hands out a provider the test keeps a handle to
struct SharedSource(Arc<MemoryProvider>);

impl ConfigurationSource for SharedSource {
    fn build(&self, _builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        Ok(self.0.clone())
    }
}

/// Provider counting how often it is loaded
struct CountingProvider(AtomicUsize);

struct CountingSource(Arc<CountingProvider>);

impl ConfigurationSource for CountingSource {
    fn build(&self, _builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        Ok(self.0.clone())
    }
}

#[async_trait]
impl ConfigurationProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn load(&self) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::new(Snapshot::new())
    }
}

/// Provider publishing a fresh generation on every read
struct ChurningProvider(AtomicUsize);

struct ChurningSource(Arc<ChurningProvider>);

impl ConfigurationSource for ChurningSource {
    fn build(&self, _builder: &ConfigurationBuilder) -> Result<Arc<dyn ConfigurationProvider>> {
        Ok(self.0.clone())
    }
}

#[async_trait]
impl ConfigurationProvider for ChurningProvider {
    fn name(&self) -> &str {
        "churning"
    }

    async fn load(&self) -> Result<()> {
        Ok(())
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        let generation = self.0.fetch_add(1, Ordering::SeqCst).to_string();
        Arc::new(
            ["A", "B", "C"]
                .into_iter()
                .map(|key| (key, generation.as_str()))
                .collect(),
        )
    }
}

#[tokio::test]
async fn test_later_layers_override_earlier_ones() {
    secretconf_utils::init_for_tests();

    let root = ConfigurationBuilder::new()
        .add_source(
            MemorySource::new()
                .with("Database:Host", "localhost")
                .with("Database:Password", "dev"),
        )
        .add_source(MemorySource::new().with("Database:Password", "prod"))
        .build()
        .await
        .unwrap();

    assert_eq!(root.get("Database:Host").as_deref(), Some("localhost"));
    assert_eq!(root.get("Database:Password").as_deref(), Some("prod"));
    assert!(!root.contains("Missing"));

    let expected: Snapshot = vec![("Database:Host", "localhost"), ("Database:Password", "prod")]
        .into_iter()
        .collect();
    assert_eq!(root.snapshot(), expected);
}

#[tokio::test]
async fn test_merged_view_reads_each_layer_once() {
    let churning = Arc::new(ChurningProvider(AtomicUsize::new(0)));
    let root = ConfigurationBuilder::new()
        .add_source(ChurningSource(churning.clone()))
        .build()
        .await
        .unwrap();

    let before = churning.0.load(Ordering::SeqCst);
    let merged = root.snapshot();

    assert_eq!(churning.0.load(Ordering::SeqCst), before + 1);
    let generation = merged.get("A").unwrap();
    assert_eq!(merged.get("B"), Some(generation));
    assert_eq!(merged.get("C"), Some(generation));
}

#[tokio::test]
async fn test_section_strips_prefix() {
    let root = ConfigurationBuilder::new()
        .add_source(
            MemorySource::new()
                .with("Database:Host", "localhost")
                .with("Database:Port", "5432")
                .with("Cache:Host", "redis"),
        )
        .build()
        .await
        .unwrap();

    let section = root.section("Database");
    assert_eq!(section.len(), 2);
    assert_eq!(section.get("Host"), Some("localhost"));
    assert_eq!(section.get("Port"), Some("5432"));
}

#[tokio::test]
async fn test_build_fails_when_a_layer_fails_to_load() {
    let result = ConfigurationBuilder::new()
        .add_source(MemorySource::new().with("a", "1"))
        .add_source(FailingSource)
        .build()
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("backing store offline"));
}

#[tokio::test]
async fn test_reload_loads_every_layer_again() {
    let counter = Arc::new(CountingProvider(AtomicUsize::new(0)));
    let root = ConfigurationBuilder::new()
        .add_source(CountingSource(counter.clone()))
        .build()
        .await
        .unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);

    root.reload().await.unwrap();
    assert_eq!(counter.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_listener_sees_layer_changes() {
    let memory = Arc::new(MemoryProvider::new(Snapshot::new()));
    let root = ConfigurationBuilder::new()
        .add_source(MemorySource::new().with("static", "1"))
        .add_source(SharedSource(memory.clone()))
        .build()
        .await
        .unwrap();

    let mut listener = root.subscribe();
    assert_eq!(listener.watched(), 2);

    memory.set("feature:enabled", "true");

    let changed = tokio::time::timeout(Duration::from_secs(1), listener.changed())
        .await
        .expect("listener should wake up");
    assert!(changed);
    assert_eq!(root.get("feature:enabled").as_deref(), Some("true"));
}

#[tokio::test]
async fn test_listener_ends_when_layers_are_gone() {
    let root = ConfigurationBuilder::new()
        .add_source(MemorySource::new())
        .build()
        .await
        .unwrap();

    let mut listener = root.subscribe();
    drop(root);

    assert!(!listener.changed().await);
    assert_eq!(listener.watched(), 0);
}
