// Snapshot cache for documents read from disk

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::models::Document;

pub mod invalidation;

pub use invalidation::{spawn_invalidation_task, Invalidate};

/// Where a cached document comes from.
#[async_trait::async_trait]
pub trait DocumentSource<T>: Send + Sync {
    async fn load(&self) -> Result<T, ServiceError>;

    /// Short description for logs (usually a path).
    fn describe(&self) -> String;
}

/// Reads and parses a whole JSON document from a file on every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonFileSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<T: Document> DocumentSource<T> for JsonFileSource<T> {
    async fn load(&self) -> Result<T, ServiceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ServiceError::data_unavailable(T::KIND, format!("{}: {e}", self.path.display()))
        })?;
        T::parse(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A single slot holding the last loaded snapshot of a document, or nothing.
///
/// The slot is only ever replaced wholesale, so readers either see the old
/// snapshot or the new one.
pub struct SnapshotCache<T> {
    slot: RwLock<Option<Arc<T>>>,
    source: Arc<dyn DocumentSource<T>>,
}

impl<T: Send + Sync + 'static> SnapshotCache<T> {
    pub fn new(source: Arc<dyn DocumentSource<T>>) -> Self {
        Self {
            slot: RwLock::new(None),
            source,
        }
    }

    /// Returns the cached snapshot, loading it from the source on a miss.
    ///
    /// A failed load leaves the slot empty and is returned to the caller
    /// as-is; nothing is retried.
    pub async fn get(&self) -> Result<Arc<T>, ServiceError> {
        if let Some(snapshot) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let mut slot = self.slot.write().await;
        // Another task may have filled the slot while we waited for the lock.
        if let Some(snapshot) = slot.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        debug!(source = %self.source.describe(), "cache miss, loading document");
        let snapshot = Arc::new(self.source.load().await?);
        *slot = Some(Arc::clone(&snapshot));
        info!(source = %self.source.describe(), "document loaded into cache");
        Ok(snapshot)
    }

    /// Drops the cached snapshot. The next [`get`](Self::get) reloads.
    pub async fn invalidate(&self) {
        self.slot.write().await.take();
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl DocumentSource<usize> for CountingSource {
        async fn load(&self) -> Result<usize, ServiceError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(ServiceError::DataUnavailable("boom".into()));
            }
            Ok(n)
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    fn source(fail: bool) -> Arc<CountingSource> {
        Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn loads_once_then_serves_from_cache() {
        let src = source(false);
        let cache = SnapshotCache::<usize>::new(src.clone());

        assert!(!cache.is_populated().await);
        assert_eq!(*cache.get().await.unwrap(), 1);
        assert_eq!(*cache.get().await.unwrap(), 1);
        assert_eq!(src.loads.load(Ordering::SeqCst), 1);
        assert!(cache.is_populated().await);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let src = source(false);
        let cache = SnapshotCache::<usize>::new(src.clone());

        let first = cache.get().await.unwrap();
        cache.invalidate().await;
        assert!(!cache.is_populated().await);

        let second = cache.get().await.unwrap();
        assert_eq!((*first, *second), (1, 2));
    }

    #[tokio::test]
    async fn failed_load_leaves_slot_empty_and_is_not_retried() {
        let src = source(true);
        let cache = SnapshotCache::<usize>::new(src.clone());

        assert!(matches!(
            cache.get().await,
            Err(ServiceError::DataUnavailable(_))
        ));
        assert!(!cache.is_populated().await);
        assert_eq!(src.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_load() {
        let src = source(false);
        let cache = Arc::new(SnapshotCache::<usize>::new(src.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { *cache.get().await.unwrap() })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(src.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn json_file_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let src: JsonFileSource<crate::models::Catalog> =
            JsonFileSource::new(dir.path().join("productos.json"));

        let err = src.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::DataUnavailable(ref msg) if msg.contains("productos.json")));
    }
}
