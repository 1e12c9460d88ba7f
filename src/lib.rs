//! Incrementally trainable multi-class Naive Bayes text classifier and CLI.
//!
//! The crate exposes both a library API and an `nbc` command line interface. A classifier is
//! trained one `(text, category)` pair at a time, scores texts with Laplace-smoothed
//! log-probabilities, and can be exported to a JSON snapshot and restored losslessly.
//!
//! ```
//! use nbc::{ClassifierConfig, NaiveBayes};
//!
//! # fn main() -> nbc::Result<()> {
//! let cfg = ClassifierConfig::builder().vocabulary_limit(0).build()?;
//! let mut classifier = NaiveBayes::new(cfg)?;
//! classifier
//!     .learn("spam words here", "spam")
//!     .learn("more spam text", "spam")
//!     .learn("hello friend", "ham");
//! assert_eq!(classifier.categorize("spam spam spam"), Some("spam"));
//!
//! let json = classifier.to_json(false)?;
//! let restored = NaiveBayes::from_json(&json)?;
//! assert_eq!(restored.probabilities("hello"), classifier.probabilities("hello"));
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature. Users targeting the library
//! portion only can disable default features to avoid the CLI dependencies:
//! `nbc = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::cast_precision_loss
)]

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod frequency;
pub mod inference;
pub mod metrics;
pub mod serialization;
pub mod state;
pub mod tokenizer;

pub use classifier::{NaiveBayes, SharedTokenizer};
pub use config::{ClassifierConfig, ConfigBuilder, PriorNormalization, TokenizerConfig};
pub use error::{NbcError, Result};
pub use frequency::FrequencyTable;
pub use inference::CategoryScore;
pub use metrics::{CategorySummary, ModelSummary};
pub use serialization::{Snapshot, STATE_KEYS};
pub use tokenizer::{DefaultTokenizer, Tokenizer};
