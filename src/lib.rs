//! Content-based title recommendations.
//!
//! A catalog snapshot is vectorized per aspect (keywords, genres, actors,
//! director, screenwriter) with TF-IDF, compared with cosine similarity and
//! combined into a weighted composite score per candidate title.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

pub use catalog::{CatalogSnapshot, CatalogStore};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    Aspect, AspectWeights, CandidateScore, RecommendedTitle, SortKey, TitleRecord, TopSimple,
};
pub use services::{
    providers::{CatalogProvider, CsvCatalogProvider, InMemoryCatalogProvider},
    CandidatePool, CancellationFlag, Recommender, RecommenderSettings, RequestContext,
};
