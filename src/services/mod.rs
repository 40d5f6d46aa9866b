pub mod aggregator;
pub mod providers;
pub mod recommendations;
pub mod request;
pub mod similarity;
pub mod stop_words;
pub mod title_search;
pub mod vectorizer;

pub use aggregator::{CandidatePool, RecommenderSettings, WeightedAggregator};
pub use recommendations::Recommender;
pub use request::{CancellationFlag, RequestContext, RequestId};
pub use similarity::SimilarityMatrix;
pub use title_search::{exists_case_insensitive, TitleIndex};
pub use vectorizer::{vectorize, FeatureMatrix};
