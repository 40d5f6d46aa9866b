use std::cmp::Ordering;

use crate::{
    catalog::CatalogSnapshot,
    error::AppResult,
    models::{
        clamp_rec_count, to_percent, CandidateScore, RecommendedTitle, SortKey, TitleRecord,
        TopSimple, MAX_REC_COUNT,
    },
    services::{
        aggregator::{CandidatePool, RecommenderSettings, WeightedAggregator},
        request::RequestContext,
    },
};

/// Content-based recommendations over one catalog snapshot
///
/// Every call builds its own vectors and similarity rows, so a recommender
/// can be created per request and several can run over the same snapshot.
pub struct Recommender<'a> {
    snapshot: &'a CatalogSnapshot,
    settings: RecommenderSettings,
    ctx: RequestContext,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender with default weights
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        Self {
            snapshot,
            settings: RecommenderSettings::default(),
            ctx: RequestContext::new(),
        }
    }

    pub fn with_settings(mut self, settings: RecommenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_context(mut self, ctx: RequestContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Scored candidate pool for `title`, with `count` clamped to [5, 20]
    pub fn candidate_pool(&self, title: &str, count: i64) -> AppResult<CandidatePool> {
        WeightedAggregator::new(self.snapshot, &self.settings, &self.ctx)
            .build_pool(title, clamp_rec_count(count))
    }

    /// [`Self::get_top_recommendations`] with the configured default count
    pub fn get_default_recommendations(
        &self,
        title: &str,
        sort_key: SortKey,
    ) -> AppResult<Vec<RecommendedTitle>> {
        self.get_top_recommendations(title, sort_key, self.settings.default_rec_count)
    }

    /// Recommendations joined with catalog metadata and ordered by `sort_key`
    ///
    /// The whole pool is ordered by similarity, re-sorted by the requested
    /// key and then truncated to the clamped count.
    pub fn get_top_recommendations(
        &self,
        title: &str,
        sort_key: SortKey,
        count: i64,
    ) -> AppResult<Vec<RecommendedTitle>> {
        let _span = self.ctx.span("top_recommendations", title).entered();
        let rec_num = clamp_rec_count(count);

        let mut pool = self.candidate_pool(title, count)?;
        rank_by_similarity(&mut pool.candidates);

        let mut recommendations = pool
            .candidates
            .iter()
            .map(|candidate| self.join_metadata(candidate))
            .collect::<AppResult<Vec<_>>>()?;

        sort_recommendations(&mut recommendations, sort_key);
        recommendations.truncate(rec_num);

        tracing::info!(
            resolved_title = %pool.target_title,
            pool_size = pool.len(),
            returned = recommendations.len(),
            sort_key = %sort_key,
            "Recommendations ready"
        );

        Ok(recommendations)
    }

    /// Top 20 titles and percentages without metadata
    ///
    /// A leading 100% entry is a self match of the target under another
    /// row; it is dropped and the window moves down by one.
    pub fn get_top_simple(&self, title: &str) -> AppResult<TopSimple> {
        let _span = self.ctx.span("top_simple", title).entered();

        let mut pool = self.candidate_pool(title, MAX_REC_COUNT as i64)?;
        rank_by_similarity(&mut pool.candidates);

        let percents: Vec<f64> = pool.candidates.iter().map(|c| to_percent(c.composite)).collect();
        let skip = usize::from(percents.first() == Some(&100.0));
        if skip == 1 {
            tracing::debug!(dropped = %pool.candidates[0].title, "Dropped perfect self match");
        }

        Ok(TopSimple {
            titles: pool
                .candidates
                .iter()
                .skip(skip)
                .take(MAX_REC_COUNT)
                .map(|c| c.title.clone())
                .collect(),
            sim_scores: percents.into_iter().skip(skip).take(MAX_REC_COUNT).collect(),
        })
    }

    /// Normalized record of the title the query resolves to
    pub fn get_title_info(&self, title: &str) -> AppResult<TitleRecord> {
        let row = self.snapshot.resolve(title)?;
        Ok(self.snapshot.record(row)?.clone())
    }

    /// Every catalog title in row order
    pub fn list_all_titles(&self) -> Vec<String> {
        self.snapshot.titles()
    }

    fn join_metadata(&self, candidate: &CandidateScore) -> AppResult<RecommendedTitle> {
        let record = self.snapshot.record(candidate.row)?;
        Ok(RecommendedTitle {
            link: record.link.clone(),
            title: record.title.clone(),
            rank: record.rank,
            score: record.score,
            sim_score: to_percent(candidate.composite),
        })
    }
}

/// Orders candidates by composite score, best first; ties keep pool order
pub fn rank_by_similarity(candidates: &mut [CandidateScore]) {
    candidates.sort_by(|a, b| b.composite.total_cmp(&a.composite));
}

/// Orders recommendations by `key`: rank ascending, everything else descending
///
/// Missing ranks and scores always sort last. The sort is stable.
pub fn sort_recommendations(items: &mut [RecommendedTitle], key: SortKey) {
    let directed = |ordering: Ordering| {
        if key.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    };
    items.sort_by(|a, b| match key {
        SortKey::Rank => missing_last(a.rank, b.rank, |x, y| directed(x.cmp(&y))),
        SortKey::Score => missing_last(a.score, b.score, |x, y| directed(x.total_cmp(&y))),
        SortKey::SimScore => directed(a.sim_score.total_cmp(&b.sim_score)),
        SortKey::Title => directed(a.title.cmp(&b.title)),
    });
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
