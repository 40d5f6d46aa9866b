pub mod aspect;
pub mod recommendation;
pub mod title;

pub use aspect::{Aspect, AspectWeights};
pub use recommendation::{
    clamp_rec_count, parse_count, to_percent, CandidateScore, RecommendedTitle, SortKey,
    TopSimple, MAX_REC_COUNT, MIN_REC_COUNT,
};
pub use title::TitleRecord;
