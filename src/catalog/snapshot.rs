use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::TitleRecord;
use crate::services::title_search::TitleIndex;

/// Immutable in-memory catalog shared by every request
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    records: Vec<TitleRecord>,
    index: TitleIndex,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Normalizes the records and builds the title index
    pub fn new(records: Vec<TitleRecord>) -> Self {
        let records: Vec<TitleRecord> = records.into_iter().map(TitleRecord::normalized).collect();
        let index = TitleIndex::build(&records);
        Self {
            records,
            index,
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, row: usize) -> AppResult<&TitleRecord> {
        self.records.get(row).ok_or_else(|| {
            AppError::DataConsistency(format!("Row {} is outside the catalog", row))
        })
    }

    /// Resolves a fuzzy title query to its row
    pub fn resolve(&self, query: &str) -> AppResult<usize> {
        self.index.resolve(query)
    }

    /// Titles in catalog order, duplicates included
    pub fn titles(&self) -> Vec<String> {
        self.records.iter().map(|r| r.title.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_normalizes_records() {
        let snapshot = CatalogSnapshot::new(vec![TitleRecord {
            genres: "['Drama', 'Romance']".to_string(),
            ..TitleRecord::new("Hometown Cha-Cha-Cha")
        }]);
        assert_eq!(snapshot.records()[0].genres, "Drama, Romance");
    }

    #[test]
    fn test_record_out_of_range() {
        let snapshot = CatalogSnapshot::new(vec![TitleRecord::new("Vincenzo")]);
        assert!(snapshot.record(0).is_ok());
        assert!(matches!(snapshot.record(3), Err(AppError::DataConsistency(_))));
    }

    #[test]
    fn test_titles_keep_duplicates() {
        let snapshot = CatalogSnapshot::new(vec![
            TitleRecord::new("X"),
            TitleRecord::new("Y"),
            TitleRecord::new("X"),
        ]);
        assert_eq!(snapshot.titles(), vec!["X", "Y", "X"]);
        assert_eq!(snapshot.resolve("x").unwrap(), 2);
    }
}
