//! Configuration builders controlling tokenization, vocabulary accounting, and priors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NbcError, Result};

/// How the categorical prior `P(C)` is normalised during inference.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PriorNormalization {
    /// `docCount[C] / totalDocuments`, the textbook maximum-likelihood prior.
    #[default]
    TotalDocuments,
    /// `docCount[C] / vocabularyLimit`. Requires a non-zero vocabulary limit.
    VocabularyLimit,
}

/// Settings for the built-in [`DefaultTokenizer`](crate::tokenizer::DefaultTokenizer).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TokenizerConfig {
    /// Keeps Cyrillic letters instead of treating them as separators.
    pub cyrillic: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { cyrillic: true }
    }
}

/// Configuration captured by a classifier at construction time.
///
/// This is the `options` entry of a persisted snapshot. Custom tokenizer functions are not
/// part of it; they are re-attached by the caller when a snapshot is imported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Upper bound on token occurrences accounted per document; `0` disables the cap.
    pub vocabulary_limit: usize,
    /// Policy used to compute the categorical prior.
    pub prior_normalization: PriorNormalization,
    /// Settings for the built-in tokenizer.
    pub tokenizer: TokenizerConfig,
}

impl ClassifierConfig {
    /// Returns a builder initialised with [`ClassifierConfig::default`].
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the invariants required for learning and inference.
    pub fn validate(&self) -> Result<()> {
        if self.prior_normalization == PriorNormalization::VocabularyLimit
            && self.vocabulary_limit == 0
        {
            return Err(NbcError::InvalidConfig(
                "prior_normalization=vocabularyLimit requires a non-zero vocabulary_limit".into(),
            ));
        }
        Ok(())
    }

    /// Parses the `options` value of a snapshot.
    ///
    /// An absent or `null` value yields the defaults. Anything other than a JSON object, or an
    /// object with unknown or mistyped keys, is rejected.
    pub fn from_options(options: Option<&Value>) -> Result<Self> {
        let cfg = match options {
            None | Some(Value::Null) => Self::default(),
            Some(value @ Value::Object(_)) => Self::deserialize(value).map_err(|err| {
                NbcError::InvalidConfig(format!("invalid classifier options: {err}"))
            })?,
            Some(other) => {
                return Err(NbcError::InvalidConfig(format!(
                    "classifier options must be an object, got `{other}`"
                )))
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Builder for [`ClassifierConfig`].
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    cfg: ClassifierConfig,
}

impl ConfigBuilder {
    /// Creates a builder with [`ClassifierConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps how many token occurrences each document contributes (0 = unlimited).
    #[must_use]
    pub fn vocabulary_limit(mut self, value: usize) -> Self {
        self.cfg.vocabulary_limit = value;
        self
    }

    /// Selects the prior normalization policy.
    #[must_use]
    pub fn prior_normalization(mut self, value: PriorNormalization) -> Self {
        self.cfg.prior_normalization = value;
        self
    }

    /// Enables or disables Cyrillic letters in the default tokenizer alphabet.
    #[must_use]
    pub fn cyrillic(mut self, enabled: bool) -> Self {
        self.cfg.tokenizer.cyrillic = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`ClassifierConfig`].
    pub fn build(self) -> Result<ClassifierConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}
