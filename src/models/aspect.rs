use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};
use crate::models::TitleRecord;

/// A categorical text column used as an independent similarity signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Keywords,
    Genres,
    Actors,
    Director,
    Screenwriter,
}

impl Aspect {
    pub const COUNT: usize = 5;

    /// All aspects in declared (weight-descending) order
    pub const ALL: [Aspect; Aspect::COUNT] = [
        Aspect::Keywords,
        Aspect::Genres,
        Aspect::Actors,
        Aspect::Director,
        Aspect::Screenwriter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Aspect::Keywords => "keywords",
            Aspect::Genres => "genres",
            Aspect::Actors => "actors",
            Aspect::Director => "director",
            Aspect::Screenwriter => "screenwriter",
        }
    }

    /// Position in [`Aspect::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The record column this aspect reads
    pub fn column(self, record: &TitleRecord) -> &str {
        match self {
            Aspect::Keywords => &record.keywords,
            Aspect::Genres => &record.genres,
            Aspect::Actors => &record.actors,
            Aspect::Director => &record.director,
            Aspect::Screenwriter => &record.screenwriter,
        }
    }

    /// Joint document of every aspect column, space separated
    pub fn composite_document(record: &TitleRecord) -> String {
        Aspect::ALL
            .iter()
            .map(|aspect| aspect.column(record))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Relative importance of each aspect
///
/// Weights need not sum to 1.0; they are relative importance, not a
/// probability distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectWeights {
    weights: [f64; Aspect::COUNT],
}

impl Default for AspectWeights {
    fn default() -> Self {
        Self {
            weights: [0.4, 0.3, 0.2, 0.05, 0.05],
        }
    }
}

impl AspectWeights {
    /// Builds weights in [`Aspect::ALL`] order, each within [0, 1]
    pub fn new(weights: [f64; Aspect::COUNT]) -> AppResult<Self> {
        for (aspect, weight) in Aspect::ALL.iter().zip(weights) {
            if !(0.0..=1.0).contains(&weight) {
                return Err(AppError::InvalidInput(format!(
                    "Weight for {} must be within [0, 1], got {}",
                    aspect, weight
                )));
            }
        }
        Ok(Self { weights })
    }

    pub fn get(&self, aspect: Aspect) -> f64 {
        self.weights[aspect.index()]
    }

    /// Upper bound of any composite score
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }
}
