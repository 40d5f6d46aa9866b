use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::TitleRecord;

/// Maps canonical titles to catalog rows
///
/// When the catalog repeats a title, the last occurrence wins. Entries keep
/// the row order of the surviving occurrences, which is the order fuzzy
/// resolution scans in.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    /// (title, row) sorted by row
    entries: Vec<(String, usize)>,
    /// Lowercased titles parallel to `entries`
    folded: Vec<String>,
    rows: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn build(records: &[TitleRecord]) -> Self {
        let mut rows = HashMap::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            rows.insert(record.title.clone(), row);
        }

        let entries: Vec<(String, usize)> = records
            .iter()
            .enumerate()
            .filter(|(row, record)| rows.get(&record.title) == Some(row))
            .map(|(row, record)| (record.title.clone(), row))
            .collect();

        let folded = entries.iter().map(|(title, _)| title.to_lowercase()).collect();

        let duplicates = records.len() - entries.len();
        if duplicates > 0 {
            tracing::debug!(duplicates, "Collapsed duplicate catalog titles");
        }

        Self {
            entries,
            folded,
            rows,
        }
    }

    /// Resolves a possibly partial, case-mismatched title to one row
    ///
    /// Case-insensitive substring search; the first match in row order wins
    /// even when several titles contain the query.
    pub fn resolve(&self, query: &str) -> AppResult<usize> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Title query cannot be empty".to_string(),
            ));
        }

        let needle = query.to_lowercase();
        self.folded
            .iter()
            .position(|title| title.contains(&needle))
            .map(|position| self.entries[position].1)
            .ok_or_else(|| AppError::NotFound(format!("No title matches '{}'", query)))
    }

    /// Exact lookup of a canonical title
    pub fn row_of(&self, title: &str) -> Option<usize> {
        self.rows.get(title).copied()
    }

    /// Number of distinct titles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-insensitive membership test; an absent or empty title is never present
pub fn exists_case_insensitive<S: AsRef<str>>(title: Option<&str>, candidates: &[S]) -> bool {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return false;
    };
    let needle = title.to_lowercase();
    candidates
        .iter()
        .any(|candidate| candidate.as_ref().to_lowercase() == needle)
}
