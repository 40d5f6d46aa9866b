use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::stop_words::is_stop_word;

/// Runs of two or more word characters
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Sparse TF-IDF rows, one per catalog row
///
/// Each row holds `(term_id, weight)` pairs sorted by term id and is L2
/// normalised, or empty when the document had no terms.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<(usize, f64)>>,
    vocabulary_size: usize,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn row(&self, row: usize) -> &[(usize, f64)] {
        &self.rows[row]
    }

    /// Whether a row has no terms at all
    pub fn is_zero_row(&self, row: usize) -> bool {
        self.rows[row].is_empty()
    }
}

/// Lowercases, tokenizes and drops stop words
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// TF-IDF transform of one text column
///
/// tf is the raw term count, idf is smoothed as `ln((1 + n) / (1 + df)) + 1`
/// and every row is L2 normalised. A column without any terms yields
/// all-zero rows.
pub fn vectorize<S: AsRef<str>>(column: &[S]) -> FeatureMatrix {
    let mut vocabulary: HashMap<String, usize> = HashMap::new();
    let mut doc_freq: Vec<usize> = Vec::new();
    let mut counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(column.len());

    for document in column {
        let mut doc_counts: HashMap<usize, usize> = HashMap::new();
        for token in tokenize(document.as_ref()) {
            let next_id = vocabulary.len();
            let term_id = *vocabulary.entry(token).or_insert(next_id);
            if term_id == doc_freq.len() {
                doc_freq.push(0);
            }
            *doc_counts.entry(term_id).or_insert(0) += 1;
        }
        for term_id in doc_counts.keys() {
            doc_freq[*term_id] += 1;
        }
        counts.push(doc_counts);
    }

    let n_docs = column.len() as f64;
    let idf: Vec<f64> = doc_freq
        .iter()
        .map(|df| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
        .collect();

    let rows = counts
        .into_iter()
        .map(|doc_counts| {
            let mut row: Vec<(usize, f64)> = doc_counts
                .into_iter()
                .map(|(term_id, count)| (term_id, count as f64 * idf[term_id]))
                .collect();
            row.sort_unstable_by_key(|(term_id, _)| *term_id);

            let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, weight) in row.iter_mut() {
                    *weight /= norm;
                }
            }
            row
        })
        .collect();

    if vocabulary.is_empty() {
        tracing::debug!(rows = column.len(), "Column has an empty vocabulary");
    }

    FeatureMatrix {
        rows,
        vocabulary_size: vocabulary.len(),
    }
}
