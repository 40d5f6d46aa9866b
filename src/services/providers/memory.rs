use tokio::sync::RwLock;

use crate::{
    error::AppResult, models::TitleRecord, services::providers::CatalogProvider,
};

/// Catalog held in memory, replaceable between reloads
#[derive(Debug, Default)]
pub struct InMemoryCatalogProvider {
    records: RwLock<Vec<TitleRecord>>,
}

impl InMemoryCatalogProvider {
    pub fn new(records: Vec<TitleRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replaces the rows served by the next load
    pub async fn replace(&self, records: Vec<TitleRecord>) {
        *self.records.write().await = records;
    }
}

#[async_trait::async_trait]
impl CatalogProvider for InMemoryCatalogProvider {
    async fn load_catalog(&self) -> AppResult<Vec<TitleRecord>> {
        Ok(self.records.read().await.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_returns_current_records() {
        let provider = InMemoryCatalogProvider::new(vec![TitleRecord::new("Vincenzo")]);
        let records = tokio_test::block_on(provider.load_catalog()).unwrap();
        assert_eq!(records.len(), 1);

        tokio_test::block_on(provider.replace(vec![
            TitleRecord::new("Vincenzo"),
            TitleRecord::new("Mouse"),
        ]));
        let records = tokio_test::block_on(provider.load_catalog()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(provider.name(), "memory");
    }
}
