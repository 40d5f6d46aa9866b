use super::vectorizer::FeatureMatrix;

/// All-pairs cosine similarity over the rows of a [`FeatureMatrix`]
///
/// Square and symmetric; values lie in [0, 1] and the diagonal is 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn compute(features: &FeatureMatrix) -> Self {
        let n = features.n_rows();
        let mut values = vec![0.0; n * n];

        for a in 0..n {
            values[a * n + a] = 1.0;
            for b in (a + 1)..n {
                let score = cosine(features.row(a), features.row(b));
                values[a * n + b] = score;
                values[b * n + a] = score;
            }
        }

        Self { n, values }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn score_of(&self, a: usize, b: usize) -> f64 {
        self.values[a * self.n + b]
    }

    pub fn row(&self, a: usize) -> &[f64] {
        &self.values[a * self.n..(a + 1) * self.n]
    }
}

/// One row of the similarity matrix, computed without building the rest
pub fn similarity_row(features: &FeatureMatrix, target: usize) -> Vec<f64> {
    (0..features.n_rows())
        .map(|other| {
            if other == target {
                1.0
            } else {
                cosine(features.row(target), features.row(other))
            }
        })
        .collect()
}

/// Cosine of two sparse rows sorted by term id, clamped to [0, 1]
///
/// A zero vector is orthogonal to everything.
pub fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Rows most similar to `target`, excluding it, best first
///
/// Ties keep catalog row order.
pub fn top_rows(scores: &[f64], target: usize, limit: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..scores.len()).filter(|row| *row != target).collect();
    rows.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vectorizer::vectorize;

    fn sample() -> FeatureMatrix {
        vectorize(&[
            "revenge chaebol",
            "revenge chaebol",
            "revenge",
            "zombie school",
            "chaebol",
            "",
        ])
    }

    #[test]
    fn test_self_similarity_is_maximal() {
        let sim = SimilarityMatrix::compute(&sample());
        for row in 0..sim.len() {
            assert!((sim.score_of(row, row) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_symmetry_and_bounds() {
        let sim = SimilarityMatrix::compute(&sample());
        for a in 0..sim.len() {
            for b in 0..sim.len() {
                assert_eq!(sim.score_of(a, b), sim.score_of(b, a));
                assert!((0.0..=1.0).contains(&sim.score_of(a, b)));
            }
        }
    }

    #[test]
    fn test_known_scores() {
        let sim = SimilarityMatrix::compute(&sample());
        assert!((sim.score_of(0, 1) - 1.0).abs() < 1e-9);
        // revenge and chaebol share the same df, so the single shared term is 1/sqrt(2)
        assert!((sim.score_of(0, 2) - 1.0 / 2f64.sqrt()).abs() < 1e-9);
        assert!((sim.score_of(0, 4) - 1.0 / 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(sim.score_of(0, 3), 0.0);
        assert_eq!(sim.score_of(0, 5), 0.0);
    }

    #[test]
    fn test_similarity_row_matches_matrix() {
        let features = sample();
        let sim = SimilarityMatrix::compute(&features);
        assert_eq!(similarity_row(&features, 2), sim.row(2).to_vec());
    }

    #[test]
    fn test_top_rows_excludes_target_and_keeps_row_order_on_ties() {
        let scores = vec![1.0, 0.2, 0.9, 0.2, 0.5];
        assert_eq!(top_rows(&scores, 0, 3), vec![2, 4, 1]);
        assert_eq!(top_rows(&scores, 2, 10), vec![0, 4, 1, 3]);
    }
}
