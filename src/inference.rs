//! Log-space scoring of texts against every learned category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::NaiveBayes;
use crate::config::PriorNormalization;
use crate::frequency::FrequencyTable;
use crate::state::CategoryCounts;

/// Log-probability of a text under one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryScore {
    /// Category label.
    pub category: String,
    /// Natural log of the unnormalised posterior, `log P(C) + Σ f·log P(t|C)`.
    pub probability: f64,
}

impl fmt::Display for CategoryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{:.6}", self.category, self.probability)
    }
}

impl NaiveBayes {
    /// Scores `text` against every category, highest log-probability first.
    ///
    /// Categories with equal scores keep their registration order. Before any document has been
    /// learned the ranking is empty, even if categories were registered up front.
    #[must_use]
    pub fn probabilities(&self, text: &str) -> Vec<CategoryScore> {
        self.ranked(text)
            .into_iter()
            .map(|(category, probability)| CategoryScore {
                category: category.to_owned(),
                probability,
            })
            .collect()
    }

    /// Returns the most probable category for `text`, or `None` before any training.
    #[must_use]
    pub fn categorize(&self, text: &str) -> Option<&str> {
        self.ranked(text).first().map(|&(category, _)| category)
    }

    /// Returns the most probable category for `text` together with its log-probability.
    #[must_use]
    pub fn categorize_with_score(&self, text: &str) -> Option<CategoryScore> {
        self.probabilities(text).into_iter().next()
    }

    /// Laplace-smoothed probability of `token` given `category`.
    ///
    /// Computed as `(occurrences in category + 1) / (category token total + vocabulary size)`,
    /// so unseen tokens receive a small positive probability. Returns `None` for unknown
    /// categories.
    #[must_use]
    pub fn token_probability(&self, token: &str, category: &str) -> Option<f64> {
        self.category(category)
            .map(|counts| token_probability(counts, token, self.vocabulary_size()))
    }

    /// Categorical prior `P(category)` under the configured normalization policy.
    ///
    /// Zero for every category while no document has been learned.
    #[must_use]
    pub fn prior(&self, category: &str) -> Option<f64> {
        let denominator = self.prior_denominator();
        self.category(category).map(|counts| {
            if denominator > 0.0 {
                counts.documents as f64 / denominator
            } else {
                0.0
            }
        })
    }

    fn prior_denominator(&self) -> f64 {
        let cfg = self.config();
        match cfg.prior_normalization {
            PriorNormalization::VocabularyLimit if cfg.vocabulary_limit > 0 => {
                cfg.vocabulary_limit as f64
            }
            _ => self.total_documents() as f64,
        }
    }

    fn ranked(&self, text: &str) -> Vec<(&str, f64)> {
        if self.total_documents() == 0 {
            return Vec::new();
        }
        let table = self.frequency_table(text);
        let denominator = self.prior_denominator();
        let vocabulary_size = self.vocabulary_size();
        let mut scores: Vec<(&str, f64)> = self
            .state
            .iter()
            .map(|(category, counts)| {
                let prior = counts.documents as f64 / denominator;
                let score = prior.ln() + log_likelihood(counts, &table, vocabulary_size);
                // Degenerate counters (no documents, empty vocabulary) can yield NaN.
                let score = if score.is_nan() { f64::NEG_INFINITY } else { score };
                (category, score)
            })
            .collect();
        // Stable: ties keep registration order.
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores
    }
}

fn token_probability(counts: &CategoryCounts, token: &str, vocabulary_size: usize) -> f64 {
    (counts.frequency(token) + 1) as f64 / (counts.tokens as f64 + vocabulary_size as f64)
}

fn log_likelihood(counts: &CategoryCounts, table: &FrequencyTable, vocabulary_size: usize) -> f64 {
    table
        .iter()
        .map(|(token, frequency)| {
            frequency as f64 * token_probability(counts, token, vocabulary_size).ln()
        })
        .sum()
}
