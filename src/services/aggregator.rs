use std::collections::HashSet;

use crate::catalog::CatalogSnapshot;
use crate::error::{AppError, AppResult};
use crate::models::{Aspect, AspectWeights, CandidateScore};
use crate::services::request::RequestContext;
use crate::services::similarity::{similarity_row, top_rows};
use crate::services::vectorizer::vectorize;

/// Aspects that seed the pool unless configured otherwise
///
/// Seeding stops when it reaches `actors`, so only `keywords` and `genres`
/// add their own top-N. The remaining aspects contribute to scoring only.
pub const DEFAULT_SEED_ASPECT_COUNT: usize = 2;

/// Count used when a caller does not ask for one
pub const DEFAULT_REC_COUNT: i64 = 10;

/// Tunables for one recommender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderSettings {
    pub weights: AspectWeights,
    /// How many aspects, in declared order, add their own top-N to the pool
    pub seed_aspect_count: usize,
    /// Requested count when the caller passes none, clamped like any other
    pub default_rec_count: i64,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            weights: AspectWeights::default(),
            seed_aspect_count: DEFAULT_SEED_ASPECT_COUNT,
            default_rec_count: DEFAULT_REC_COUNT,
        }
    }
}

/// Scored candidates for one target title
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool {
    pub target_row: usize,
    pub target_title: String,
    /// In discovery order, without duplicates and without the target
    pub candidates: Vec<CandidateScore>,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.title.as_str()).collect()
    }
}

/// Similarity rows against the target, computed at most once per aspect
struct AspectSimilarities<'a> {
    snapshot: &'a CatalogSnapshot,
    target: usize,
    rows: [Option<Vec<f64>>; Aspect::COUNT],
}

impl<'a> AspectSimilarities<'a> {
    fn new(snapshot: &'a CatalogSnapshot, target: usize) -> Self {
        Self {
            snapshot,
            target,
            rows: Default::default(),
        }
    }

    fn get(&mut self, aspect: Aspect) -> &[f64] {
        let snapshot = self.snapshot;
        let target = self.target;
        self.rows[aspect.index()].get_or_insert_with(|| {
            let column: Vec<&str> = snapshot
                .records()
                .iter()
                .map(|record| aspect.column(record))
                .collect();
            let features = vectorize(&column);
            tracing::debug!(
                aspect = %aspect,
                vocabulary = features.vocabulary_size(),
                "Vectorized aspect"
            );
            similarity_row(&features, target)
        })
    }
}

/// Builds and scores the candidate pool for a target title
pub struct WeightedAggregator<'a> {
    snapshot: &'a CatalogSnapshot,
    settings: &'a RecommenderSettings,
    ctx: &'a RequestContext,
}

impl<'a> WeightedAggregator<'a> {
    pub fn new(
        snapshot: &'a CatalogSnapshot,
        settings: &'a RecommenderSettings,
        ctx: &'a RequestContext,
    ) -> Self {
        Self {
            snapshot,
            settings,
            ctx,
        }
    }

    /// Seeds, extends and scores the pool
    ///
    /// The joint vectorization of all aspect columns seeds `rec_num`
    /// candidates; each seed aspect then adds its own top `rec_num`. Every
    /// candidate is scored on all five aspects regardless of seeding.
    pub fn build_pool(&self, query: &str, rec_num: usize) -> AppResult<CandidatePool> {
        let target = self.snapshot.resolve(query)?;
        let target_title = self.snapshot.record(target)?.title.clone();
        self.ctx.check()?;

        let composite: Vec<String> = self
            .snapshot
            .records()
            .iter()
            .map(Aspect::composite_document)
            .collect();
        let composite_scores = similarity_row(&vectorize(&composite), target);

        let mut pool: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        self.extend_pool(&mut pool, &mut seen, &top_rows(&composite_scores, target, rec_num))?;
        let seeded = pool.len();

        let mut similarities = AspectSimilarities::new(self.snapshot, target);
        for aspect in Aspect::ALL.iter().take(self.settings.seed_aspect_count) {
            self.ctx.check()?;
            let rows = top_rows(similarities.get(*aspect), target, rec_num);
            self.extend_pool(&mut pool, &mut seen, &rows)?;
        }

        pool.retain(|title| *title != target_title);

        tracing::debug!(
            target_row = target,
            seeded,
            pool_size = pool.len(),
            "Candidate pool assembled"
        );

        let mut candidates = Vec::with_capacity(pool.len());
        for title in pool {
            let row = self.snapshot.index().row_of(&title).ok_or_else(|| {
                AppError::DataConsistency(format!("Candidate '{}' is not in the catalog", title))
            })?;

            let mut aspect_scores = [0.0; Aspect::COUNT];
            for aspect in Aspect::ALL {
                self.ctx.check()?;
                aspect_scores[aspect.index()] =
                    similarities.get(aspect)[row] * self.settings.weights.get(aspect);
            }

            candidates.push(CandidateScore {
                title,
                row,
                aspect_scores,
                composite: aspect_scores.iter().sum(),
            });
        }

        Ok(CandidatePool {
            target_row: target,
            target_title,
            candidates,
        })
    }

    fn extend_pool(
        &self,
        pool: &mut Vec<String>,
        seen: &mut HashSet<String>,
        rows: &[usize],
    ) -> AppResult<()> {
        for row in rows {
            let title = &self.snapshot.record(*row)?.title;
            if seen.insert(title.clone()) {
                pool.push(title.clone());
            }
        }
        Ok(())
    }
}
