use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::CatalogSnapshot;
use crate::error::AppResult;
use crate::services::providers::CatalogProvider;

/// Shared handle to the current catalog snapshot
///
/// Requests take an `Arc` of the snapshot and keep it for their whole
/// lifetime. A reload builds the new snapshot first and then swaps it in, so
/// in-flight requests never see a partially loaded catalog.
#[derive(Clone)]
pub struct CatalogStore {
    provider: Arc<dyn CatalogProvider>,
    current: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl CatalogStore {
    /// Loads the initial snapshot from the provider
    pub async fn load(provider: Arc<dyn CatalogProvider>) -> AppResult<Self> {
        let snapshot = Self::fetch(provider.as_ref()).await?;
        Ok(Self {
            provider,
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        })
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    /// Re-reads the catalog and atomically replaces the snapshot
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let snapshot = Arc::new(Self::fetch(self.provider.as_ref()).await?);
        *self.current.write().await = snapshot.clone();
        Ok(snapshot)
    }

    async fn fetch(provider: &dyn CatalogProvider) -> AppResult<CatalogSnapshot> {
        let records = provider.load_catalog().await?;
        let snapshot = CatalogSnapshot::new(records);

        tracing::info!(
            provider = provider.name(),
            rows = snapshot.len(),
            distinct_titles = snapshot.index().len(),
            "Catalog snapshot loaded"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::TitleRecord;
    use crate::services::providers::MockCatalogProvider;

    #[tokio::test]
    async fn test_load_builds_snapshot() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_load_catalog()
            .times(1)
            .returning(|| Ok(vec![TitleRecord::new("Vincenzo"), TitleRecord::new("Mouse")]));
        provider.expect_name().return_const("mock");

        let store = CatalogStore::load(Arc::new(provider)).await.unwrap();
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.resolve("mouse").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let mut provider = MockCatalogProvider::new();
        let mut calls = 0;
        provider.expect_load_catalog().times(2).returning(move || {
            calls += 1;
            let mut records = vec![TitleRecord::new("Vincenzo")];
            if calls > 1 {
                records.push(TitleRecord::new("Mouse"));
            }
            Ok(records)
        });
        provider.expect_name().return_const("mock");

        let store = CatalogStore::load(Arc::new(provider)).await.unwrap();
        let before = store.snapshot().await;

        let reloaded = store.reload().await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(store.snapshot().await.len(), 2);
        // Holders of the old snapshot keep their view
        assert_eq!(before.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let mut provider = MockCatalogProvider::new();
        let mut calls = 0;
        provider.expect_load_catalog().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![TitleRecord::new("Vincenzo")])
            } else {
                Err(AppError::Catalog("source unavailable".to_string()))
            }
        });
        provider.expect_name().return_const("mock");

        let store = CatalogStore::load(Arc::new(provider)).await.unwrap();
        assert!(matches!(store.reload().await, Err(AppError::Catalog(_))));
        assert_eq!(store.snapshot().await.len(), 1);
    }
}
