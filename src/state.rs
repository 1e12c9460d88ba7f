//! Mutable statistical model owned by a classifier.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::frequency::FrequencyTable;

/// Counters tracked for a single category.
///
/// Read-only outside the crate; counters only change through [`ClassifierState`] updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub(crate) documents: u64,
    pub(crate) tokens: u64,
    pub(crate) frequencies: FxHashMap<String, u64>,
}

impl CategoryCounts {
    /// Number of documents learned for the category.
    #[must_use]
    pub fn documents(&self) -> u64 {
        self.documents
    }

    /// Total token occurrences attributed to the category.
    #[must_use]
    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    /// Cumulative occurrences of each token within the category.
    #[must_use]
    pub fn frequencies(&self) -> &FxHashMap<String, u64> {
        &self.frequencies
    }

    /// Occurrences of `token` within the category, zero when never seen.
    #[must_use]
    pub fn frequency(&self, token: &str) -> u64 {
        self.frequencies.get(token).copied().unwrap_or(0)
    }
}

/// Vocabulary, per-category counters, and the document total.
///
/// Categories are kept in registration order, which callers rely on for deterministic
/// tie-breaking. The state only grows: nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierState {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
    counts: Vec<CategoryCounts>,
    vocabulary: FxHashSet<String>,
    total_documents: u64,
}

impl ClassifierState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with zeroed counters unless it is already known.
    pub fn initialize_category(&mut self, name: &str) {
        self.register(name);
    }

    /// Accounts one document of `category` with the given frequency table.
    pub fn record_document(&mut self, category: &str, table: &FrequencyTable) {
        let slot = self.register(category);
        self.total_documents += 1;
        let entry = &mut self.counts[slot];
        entry.documents += 1;
        for (token, count) in table.iter() {
            if !self.vocabulary.contains(token) {
                self.vocabulary.insert(token.to_owned());
            }
            *entry.frequencies.entry(token.to_owned()).or_insert(0) += count;
            entry.tokens += count;
        }
    }

    fn register(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.index.get(name) {
            return slot;
        }
        let slot = self.names.len();
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), slot);
        self.counts.push(CategoryCounts::default());
        slot
    }

    /// Category labels in registration order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.names
    }

    /// Counters for `category`, if it has been registered.
    #[must_use]
    pub fn category(&self, category: &str) -> Option<&CategoryCounts> {
        self.index.get(category).map(|&slot| &self.counts[slot])
    }

    /// Iterates over categories and their counters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryCounts)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter())
    }

    /// Distinct tokens observed across all categories.
    #[must_use]
    pub fn vocabulary(&self) -> &FxHashSet<String> {
        &self.vocabulary
    }

    /// Number of distinct tokens observed across all categories.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Total number of documents learned.
    #[must_use]
    pub fn total_documents(&self) -> u64 {
        self.total_documents
    }

    /// Rebuilds a state from already-validated parts without re-checking invariants.
    pub(crate) fn from_parts(
        categories: Vec<(String, CategoryCounts)>,
        vocabulary: FxHashSet<String>,
        total_documents: u64,
    ) -> Self {
        let mut state = Self {
            vocabulary,
            total_documents,
            ..Self::default()
        };
        for (name, counts) in categories {
            if state.index.contains_key(&name) {
                continue;
            }
            state.index.insert(name.clone(), state.names.len());
            state.names.push(name);
            state.counts.push(counts);
        }
        state
    }
}
