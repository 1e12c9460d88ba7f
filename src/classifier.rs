//! The classifier façade: construction, incremental learning, and state accessors.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::metrics::ModelSummary;
use crate::state::{CategoryCounts, ClassifierState};
use crate::tokenizer::{DefaultTokenizer, Tokenizer};

/// Shared handle to a tokenizer implementation.
pub type SharedTokenizer = Arc<dyn Tokenizer + Send + Sync>;

/// Multinomial Naive Bayes text classifier with Laplace smoothing.
///
/// Learning mutates the model in place one document at a time; inference only reads it.
///
/// ```
/// use nbc::NaiveBayes;
///
/// let mut classifier = NaiveBayes::default();
/// classifier
///     .learn("cheap pills buy now", "spam")
///     .learn("lunch at noon tomorrow", "ham");
/// assert_eq!(classifier.categorize("buy cheap pills"), Some("spam"));
/// ```
#[derive(Clone)]
pub struct NaiveBayes {
    cfg: ClassifierConfig,
    tokenizer: SharedTokenizer,
    pub(crate) state: ClassifierState,
}

impl NaiveBayes {
    /// Creates an empty classifier using the built-in tokenizer configured by `cfg`.
    pub fn new(cfg: ClassifierConfig) -> Result<Self> {
        let tokenizer = Arc::new(DefaultTokenizer::new(cfg.tokenizer));
        Self::with_tokenizer(cfg, tokenizer)
    }

    /// Creates an empty classifier that tokenizes with the supplied implementation.
    pub fn with_tokenizer(cfg: ClassifierConfig, tokenizer: SharedTokenizer) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            tokenizer,
            state: ClassifierState::new(),
        })
    }

    pub(crate) fn from_state(
        cfg: ClassifierConfig,
        tokenizer: Option<SharedTokenizer>,
        state: ClassifierState,
    ) -> Result<Self> {
        let tokenizer: SharedTokenizer = match tokenizer {
            Some(tokenizer) => tokenizer,
            None => Arc::new(DefaultTokenizer::new(cfg.tokenizer)),
        };
        let mut classifier = Self::with_tokenizer(cfg, tokenizer)?;
        classifier.state = state;
        Ok(classifier)
    }

    /// Returns the configuration captured at construction.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.cfg
    }

    /// Returns the tokenizer used for learning and inference.
    #[must_use]
    pub fn tokenizer(&self) -> &SharedTokenizer {
        &self.tokenizer
    }

    /// Registers `category` with zeroed counters if it is not known yet.
    pub fn initialize_category(&mut self, category: &str) -> &mut Self {
        self.state.initialize_category(category);
        self
    }

    /// Learns that `text` belongs to `category`.
    ///
    /// Text that tokenizes to nothing still counts as a document of the category.
    pub fn learn(&mut self, text: &str, category: &str) -> &mut Self {
        let table = self.frequency_table(text);
        self.state.record_document(category, &table);
        debug!(
            "learned document #{} for {category:?}: {} distinct tokens, {} occurrences",
            self.state.total_documents(),
            table.len(),
            table.total()
        );
        self
    }

    /// Learns every `(text, category)` pair in order.
    pub fn learn_all<I, T, C>(&mut self, documents: I) -> &mut Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        for (text, category) in documents {
            self.learn(text.as_ref(), category.as_ref());
        }
        self
    }

    /// Tokenizes `text` and builds its frequency table under the configured vocabulary limit.
    #[must_use]
    pub fn frequency_table(&self, text: &str) -> FrequencyTable {
        let tokens = self.tokenizer.tokenize(text);
        let table = FrequencyTable::build(&tokens, self.cfg.vocabulary_limit);
        if table.total() < tokens.len() as u64 {
            trace!(
                "vocabulary limit {} kept {} of {} token occurrences",
                self.cfg.vocabulary_limit,
                table.total(),
                tokens.len()
            );
        }
        table
    }

    /// Category labels in registration order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        self.state.categories()
    }

    /// Counters recorded for `category`.
    #[must_use]
    pub fn category(&self, category: &str) -> Option<&CategoryCounts> {
        self.state.category(category)
    }

    /// Total number of documents learned.
    #[must_use]
    pub fn total_documents(&self) -> u64 {
        self.state.total_documents()
    }

    /// Number of documents learned for `category`.
    #[must_use]
    pub fn document_count(&self, category: &str) -> Option<u64> {
        self.state.category(category).map(|counts| counts.documents)
    }

    /// Total token occurrences attributed to `category`.
    #[must_use]
    pub fn word_count(&self, category: &str) -> Option<u64> {
        self.state.category(category).map(|counts| counts.tokens)
    }

    /// Occurrences of `token` within `category`.
    #[must_use]
    pub fn word_frequency(&self, category: &str, token: &str) -> Option<u64> {
        self.state
            .category(category)
            .map(|counts| counts.frequency(token))
    }

    /// Returns true when `token` has been observed in any category.
    #[must_use]
    pub fn contains_token(&self, token: &str) -> bool {
        self.state.vocabulary().contains(token)
    }

    /// Number of distinct tokens observed across all categories.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.state.vocabulary_size()
    }

    /// Read-only view of the whole model.
    #[must_use]
    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    /// Summarises the model for reporting.
    #[must_use]
    pub fn summary(&self) -> ModelSummary {
        ModelSummary::from_classifier(self)
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self {
            cfg: ClassifierConfig::default(),
            tokenizer: Arc::new(DefaultTokenizer::default()),
            state: ClassifierState::new(),
        }
    }
}

impl fmt::Debug for NaiveBayes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaiveBayes")
            .field("config", &self.cfg)
            .field("categories", &self.state.categories())
            .field("total_documents", &self.state.total_documents())
            .field("vocabulary_size", &self.state.vocabulary_size())
            .finish_non_exhaustive()
    }
}
