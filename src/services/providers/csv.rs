//! CSV catalog provider
//!
//! Reads the tabular catalog export: one row per title with the columns
//! `title, description, keywords, genres, actors, director, screenwriter,
//! rank, score, link`. Extra columns are ignored and missing columns read as
//! empty. Unparsable rank or score cells become `None` instead of failing the
//! whole load.

use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use crate::{
    error::AppResult, models::TitleRecord, services::providers::CatalogProvider,
};

#[derive(Debug, Clone)]
pub struct CsvCatalogProvider {
    path: PathBuf,
}

/// Raw CSV row before numeric parsing
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    keywords: String,
    #[serde(default)]
    genres: String,
    #[serde(default)]
    actors: String,
    #[serde(default)]
    director: String,
    #[serde(default)]
    screenwriter: String,
    #[serde(default)]
    rank: String,
    #[serde(default)]
    score: String,
    #[serde(default)]
    link: String,
}

impl CsvRow {
    fn into_record(self) -> TitleRecord {
        let rank = parse_rank(&self.rank);
        if rank.is_none() && !is_missing(&self.rank) {
            tracing::warn!(title = %self.title, value = %self.rank, "Unparsable rank");
        }
        let score = self.score.trim().parse::<f64>().ok().filter(|s| s.is_finite());
        if score.is_none() && !is_missing(&self.score) {
            tracing::warn!(title = %self.title, value = %self.score, "Unparsable score");
        }

        TitleRecord {
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            genres: self.genres,
            actors: self.actors,
            director: self.director,
            screenwriter: self.screenwriter,
            rank,
            score,
            link: self.link,
        }
    }
}

fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "N/A"
}

/// Accepts `12`, `#12` and `12.0`
fn parse_rank(value: &str) -> Option<u32> {
    let value = value.trim().trim_start_matches('#');
    value.parse::<u32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

impl CsvCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses catalog rows from any CSV source with a header line
    pub fn parse<R: Read>(reader: R) -> AppResult<Vec<TitleRecord>> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<CsvRow>() {
            records.push(row?.into_record());
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for CsvCatalogProvider {
    async fn load_catalog(&self) -> AppResult<Vec<TitleRecord>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records = Self::parse(bytes.as_slice())?;

        tracing::info!(
            path = %self.path.display(),
            rows = records.len(),
            "Loaded catalog from CSV"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
rank,title,year,keywords,genres,actors,director,screenwriter,score,link,description
#1,Move to Heaven,2021,\"['grief', 'trauma cleaner']\",\"['Life', 'Drama']\",\"['Lee Je-hoon']\",Kim Sung-ho,Yoon Ji-ryun,9.2,https://example.com/move-to-heaven,A trauma cleaner
2,Hospital Playlist,2020,,\"['Medical']\",,Shin Won-ho,Lee Woo-jung,9.1,https://example.com/hospital-playlist,
,Unranked,2019,,,,N/A,,not-a-number,,
";

    #[test]
    fn test_parse_reads_known_columns() {
        let records = CsvCatalogProvider::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.title, "Move to Heaven");
        assert_eq!(first.rank, Some(1));
        assert_eq!(first.score, Some(9.2));
        assert_eq!(first.keywords, "['grief', 'trauma cleaner']");
        assert_eq!(first.director, "Kim Sung-ho");
        assert_eq!(first.link, "https://example.com/move-to-heaven");
    }

    #[test]
    fn test_parse_missing_values() {
        let records = CsvCatalogProvider::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records[1].keywords, "");
        assert_eq!(records[1].actors, "");
        assert_eq!(records[2].rank, None);
        assert_eq!(records[2].score, None);
    }

    #[test]
    fn test_parse_missing_columns_default_to_empty() {
        let records = CsvCatalogProvider::parse("title,score\nVincenzo,8.9\n".as_bytes()).unwrap();
        assert_eq!(records[0].title, "Vincenzo");
        assert_eq!(records[0].genres, "");
        assert_eq!(records[0].rank, None);
        assert_eq!(records[0].score, Some(8.9));
    }

    #[test]
    fn test_parse_rank_formats() {
        assert_eq!(parse_rank("#12"), Some(12));
        assert_eq!(parse_rank("12.0"), Some(12));
        assert_eq!(parse_rank("12.5"), None);
        assert_eq!(parse_rank(""), None);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let provider = CsvCatalogProvider::new("/nonexistent/catalog.csv");
        let result = provider.load_catalog().await;
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }
}
