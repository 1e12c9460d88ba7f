//! Summaries describing a trained model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::NaiveBayes;
use crate::config::PriorNormalization;

/// Counters captured for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    /// Category label.
    pub name: String,
    /// Documents learned for the category.
    pub documents: u64,
    /// Token occurrences attributed to the category.
    pub tokens: u64,
    /// Distinct tokens seen in the category.
    pub distinct_tokens: usize,
    /// Categorical prior under the configured normalization policy.
    pub prior: f64,
}

/// Aggregate view of a classifier, in category registration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSummary {
    /// Total documents learned.
    pub total_documents: u64,
    /// Distinct tokens across all categories.
    pub vocabulary_size: usize,
    /// Configured per-document vocabulary limit (0 = unlimited).
    pub vocabulary_limit: usize,
    /// Configured prior normalization policy.
    pub prior_normalization: PriorNormalization,
    /// Per-category counters.
    pub categories: Vec<CategorySummary>,
}

impl ModelSummary {
    /// Collects the summary of `classifier`.
    #[must_use]
    pub fn from_classifier(classifier: &NaiveBayes) -> Self {
        let categories = classifier
            .state()
            .iter()
            .map(|(name, counts)| CategorySummary {
                name: name.to_owned(),
                documents: counts.documents,
                tokens: counts.tokens,
                distinct_tokens: counts.frequencies.len(),
                prior: classifier.prior(name).unwrap_or(0.0),
            })
            .collect();
        Self {
            total_documents: classifier.total_documents(),
            vocabulary_size: classifier.vocabulary_size(),
            vocabulary_limit: classifier.config().vocabulary_limit,
            prior_normalization: classifier.config().prior_normalization,
            categories,
        }
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Documents    : {}", self.total_documents)?;
        writeln!(f, "Vocabulary   : {}", self.vocabulary_size)?;
        if self.vocabulary_limit == 0 {
            writeln!(f, "Limit        : (unlimited)")?;
        } else {
            writeln!(f, "Limit        : {}", self.vocabulary_limit)?;
        }
        writeln!(f, "Prior        : {:?}", self.prior_normalization)?;
        writeln!(f, "Categories   : {}", self.categories.len())?;
        for category in &self.categories {
            writeln!(
                f,
                "  {:<20} docs {:>8} tokens {:>10} distinct {:>8} prior {:.4}",
                category.name,
                category.documents,
                category.tokens,
                category.distinct_tokens,
                category.prior
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_per_category_counters() {
        let mut classifier = NaiveBayes::default();
        classifier
            .learn("a b b", "x")
            .learn("c", "y")
            .learn("a", "x");
        let summary = classifier.summary();
        assert_eq!(summary.total_documents, 3);
        assert_eq!(summary.vocabulary_size, 3);
        assert_eq!(summary.categories.len(), 2);
        let x = &summary.categories[0];
        assert_eq!(x.name, "x");
        assert_eq!(x.documents, 2);
        assert_eq!(x.tokens, 4);
        assert_eq!(x.distinct_tokens, 2);
        assert!((x.prior - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn untrained_categories_report_zero_prior() {
        let mut classifier = NaiveBayes::default();
        classifier.initialize_category("pending");
        let summary = classifier.summary();
        assert_eq!(summary.categories[0].prior, 0.0);
        let text = summary.to_string();
        assert!(text.contains("prior 0.0000"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn display_lists_categories() {
        let mut classifier = NaiveBayes::default();
        classifier.learn("hello", "greeting");
        let text = classifier.summary().to_string();
        assert!(text.contains("Documents    : 1"));
        assert!(text.contains("greeting"));
        assert!(text.contains("(unlimited)"));
    }
}
