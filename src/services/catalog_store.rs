use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::cache::{DocumentSource, Invalidate, JsonFileSource, SnapshotCache};
use crate::errors::ServiceError;
use crate::models::{Catalog, CompanyInfo};

/// Lazily loaded, shared copies of the product catalog and company info.
///
/// Each document has its own cache slot. A request that finds a slot empty
/// loads it; everyone else reads the current snapshot.
pub struct CatalogStore {
    catalog: SnapshotCache<Catalog>,
    company: SnapshotCache<CompanyInfo>,
}

impl CatalogStore {
    /// Store backed by the two JSON files on disk.
    pub fn from_files(catalog_path: impl Into<PathBuf>, company_path: impl Into<PathBuf>) -> Self {
        Self::with_sources(
            Arc::new(JsonFileSource::<Catalog>::new(catalog_path)),
            Arc::new(JsonFileSource::<CompanyInfo>::new(company_path)),
        )
    }

    pub fn with_sources(
        catalog: Arc<dyn DocumentSource<Catalog>>,
        company: Arc<dyn DocumentSource<CompanyInfo>>,
    ) -> Self {
        Self {
            catalog: SnapshotCache::new(catalog),
            company: SnapshotCache::new(company),
        }
    }

    pub async fn get_catalog(&self) -> Result<Arc<Catalog>, ServiceError> {
        self.catalog.get().await
    }

    pub async fn get_company_info(&self) -> Result<Arc<CompanyInfo>, ServiceError> {
        self.company.get().await
    }

    /// Empties both slots. Snapshots already handed out stay valid.
    pub async fn invalidate(&self) {
        self.catalog.invalidate().await;
        self.company.invalidate().await;
        info!("catalog and company caches invalidated");
    }

    /// Loads both documents, for readiness probes.
    pub async fn ensure_loaded(&self) -> Result<(), ServiceError> {
        self.get_catalog().await?;
        self.get_company_info().await?;
        Ok(())
    }
}

#[async_trait]
impl Invalidate for CatalogStore {
    async fn invalidate(&self) {
        CatalogStore::invalidate(self).await;
    }
}
