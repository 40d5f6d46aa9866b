use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};
use crate::models::Aspect;

/// Smallest number of recommendations a request can return
pub const MIN_REC_COUNT: usize = 5;
/// Largest number of recommendations a request can return
pub const MAX_REC_COUNT: usize = 20;

/// Clamps a requested count into [`MIN_REC_COUNT`, `MAX_REC_COUNT`]
pub fn clamp_rec_count(count: i64) -> usize {
    count.clamp(MIN_REC_COUNT as i64, MAX_REC_COUNT as i64) as usize
}

/// Parses a caller-supplied count; any integer is accepted and clamped
pub fn parse_count(raw: &str) -> AppResult<usize> {
    raw.trim()
        .parse::<i64>()
        .map(clamp_rec_count)
        .map_err(|_| AppError::InvalidInput(format!("Count must be an integer, got '{}'", raw)))
}

/// Field the final recommendation list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending, "#1" first
    Rank,
    Score,
    SimScore,
    Title,
}

impl SortKey {
    /// Rank is the only key sorted ascending
    pub fn is_ascending(self) -> bool {
        matches!(self, SortKey::Rank)
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rank" => Ok(SortKey::Rank),
            "score" => Ok(SortKey::Score),
            "sim_score" | "sim score" => Ok(SortKey::SimScore),
            "title" => Ok(SortKey::Title),
            other => Err(AppError::InvalidInput(format!("Unknown sort key '{}'", other))),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortKey::Rank => "rank",
            SortKey::Score => "score",
            SortKey::SimScore => "sim_score",
            SortKey::Title => "title",
        };
        write!(f, "{}", name)
    }
}

/// A candidate title with its weighted per-aspect scores
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub title: String,
    /// Catalog row the title resolves to
    pub row: usize,
    /// Weighted scores in [`Aspect::ALL`] order
    pub aspect_scores: [f64; Aspect::COUNT],
    /// Sum of the weighted aspect scores
    pub composite: f64,
}

impl CandidateScore {
    pub fn aspect_score(&self, aspect: Aspect) -> f64 {
        self.aspect_scores[aspect.index()]
    }
}

/// One entry of the caller-facing recommendation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedTitle {
    pub link: String,
    pub title: String,
    pub rank: Option<u32>,
    pub score: Option<f64>,
    /// Composite similarity as a percentage rounded to one decimal
    pub sim_score: f64,
}

/// Result of the simple top-20 entry point
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopSimple {
    pub titles: Vec<String>,
    pub sim_scores: Vec<f64>,
}

/// Converts a composite score to a percentage rounded to one decimal (ties to even)
pub fn to_percent(composite: f64) -> f64 {
    (composite * 100.0 * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_rec_count() {
        assert_eq!(clamp_rec_count(2), 5);
        assert_eq!(clamp_rec_count(-3), 5);
        assert_eq!(clamp_rec_count(12), 12);
        assert_eq!(clamp_rec_count(999), 20);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("7").unwrap(), 7);
        assert_eq!(parse_count(" 100 ").unwrap(), 20);
        assert!(matches!(parse_count("ten"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("rank".parse::<SortKey>().unwrap(), SortKey::Rank);
        assert_eq!("Score".parse::<SortKey>().unwrap(), SortKey::Score);
        assert_eq!("sim score".parse::<SortKey>().unwrap(), SortKey::SimScore);
        assert_eq!("sim_score".parse::<SortKey>().unwrap(), SortKey::SimScore);
        assert_eq!("title".parse::<SortKey>().unwrap(), SortKey::Title);
        assert!(matches!("year".parse::<SortKey>(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_only_rank_ascends() {
        assert!(SortKey::Rank.is_ascending());
        assert!(!SortKey::Score.is_ascending());
        assert!(!SortKey::SimScore.is_ascending());
        assert!(!SortKey::Title.is_ascending());
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.343), 34.3);
        assert_eq!(to_percent(0.9), 90.0);
        assert_eq!(to_percent(0.0), 0.0);
        assert_eq!(to_percent(0.9999999999999998), 100.0);
    }

    #[test]
    fn test_sort_key_serialization() {
        let json = serde_json::to_string(&SortKey::SimScore).unwrap();
        assert_eq!(json, "\"sim_score\"");
    }
}
