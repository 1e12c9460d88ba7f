//! Per-document token frequency tables.

use rustc_hash::FxHashMap;

/// Token occurrence counts for a single document, kept in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    /// Counts the occurrences of every token in `tokens`.
    ///
    /// When `vocabulary_limit` is non-zero and the document holds more tokens than the limit,
    /// only part of the table is kept: entries are ranked by ascending count (ties keep
    /// first-occurrence order) and accumulated until the running occurrence total reaches the
    /// limit. Kept entries retain their full counts, so the total may overshoot the limit by
    /// the last entry.
    #[must_use]
    pub fn build<S: AsRef<str>>(tokens: &[S], vocabulary_limit: usize) -> Self {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        let mut entries: Vec<(String, u64)> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            match index.get(token) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    index.insert(token, entries.len());
                    entries.push((token.to_owned(), 1));
                }
            }
        }

        if vocabulary_limit == 0 || tokens.len() <= vocabulary_limit {
            return Self { entries };
        }

        // Stable sort keeps first-occurrence order among equal counts.
        entries.sort_by_key(|(_, count)| *count);
        let limit = vocabulary_limit as u64;
        let mut accumulated = 0u64;
        let mut kept = 0usize;
        for (_, count) in &entries {
            accumulated += count;
            kept += 1;
            if accumulated >= limit {
                break;
            }
        }
        entries.truncate(kept);
        Self { entries }
    }

    /// Iterates over `(token, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries
            .iter()
            .map(|(token, count)| (token.as_str(), *count))
    }

    /// Returns the count recorded for `token`, if it is part of the table.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == token)
            .map(|(_, count)| *count)
    }

    /// Number of distinct tokens in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts in the table.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}
