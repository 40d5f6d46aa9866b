use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{Aspect, AspectWeights};
use crate::services::aggregator::{
    RecommenderSettings, DEFAULT_REC_COUNT, DEFAULT_SEED_ASPECT_COUNT,
};

/// Configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// CSV catalog export
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default = "default_keywords_weight")]
    pub keywords_weight: f64,

    #[serde(default = "default_genres_weight")]
    pub genres_weight: f64,

    #[serde(default = "default_actors_weight")]
    pub actors_weight: f64,

    #[serde(default = "default_minor_weight")]
    pub director_weight: f64,

    #[serde(default = "default_minor_weight")]
    pub screenwriter_weight: f64,

    /// Aspects, in declared order, that add their own top-N to the pool
    #[serde(default = "default_seed_aspect_count")]
    pub seed_aspect_count: usize,

    /// Count used when a caller does not ask for one
    #[serde(default = "default_rec_count")]
    pub default_rec_count: i64,
}

fn default_catalog_path() -> String {
    "kdrama-data/csv/kdrama_data.csv".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_keywords_weight() -> f64 {
    0.4
}

fn default_genres_weight() -> f64 {
    0.3
}

fn default_actors_weight() -> f64 {
    0.2
}

fn default_minor_weight() -> f64 {
    0.05
}

fn default_seed_aspect_count() -> usize {
    DEFAULT_SEED_ASPECT_COUNT
}

fn default_rec_count() -> i64 {
    DEFAULT_REC_COUNT
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Validated recommender settings
    pub fn settings(&self) -> AppResult<RecommenderSettings> {
        let weights = AspectWeights::new([
            self.keywords_weight,
            self.genres_weight,
            self.actors_weight,
            self.director_weight,
            self.screenwriter_weight,
        ])?;

        Ok(RecommenderSettings {
            weights,
            seed_aspect_count: self.seed_aspect_count.min(Aspect::COUNT),
            default_rec_count: self.default_rec_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.catalog_path, "kdrama-data/csv/kdrama_data.csv");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.default_rec_count, 10);
        assert_eq!(config.settings().unwrap(), RecommenderSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("CATALOG_PATH", "/data/catalog.csv"),
            ("KEYWORDS_WEIGHT", "0.5"),
            ("SEED_ASPECT_COUNT", "9"),
            ("DEFAULT_REC_COUNT", "15"),
        ]);
        assert_eq!(config.catalog_path, "/data/catalog.csv");

        let settings = config.settings().unwrap();
        assert_eq!(settings.weights.get(Aspect::Keywords), 0.5);
        assert_eq!(settings.seed_aspect_count, Aspect::COUNT);
        assert_eq!(settings.default_rec_count, 15);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let config = from_pairs(&[("GENRES_WEIGHT", "2.0")]);
        assert!(matches!(config.settings(), Err(AppError::InvalidInput(_))));
    }
}
