//! Tokenization capability consumed by learning and inference.
//!
//! Any `Fn(&str) -> Vec<String>` can stand in for the built-in [`DefaultTokenizer`]; the same
//! tokenizer must be used for training and inference.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::TokenizerConfig;

/// Maps a text to an ordered sequence of tokens.
///
/// Implementations must be deterministic and total: every string yields a (possibly empty)
/// token sequence.
pub trait Tokenizer {
    /// Splits `text` into tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

// CJK Unified Ideographs as matched by the classic `一-龥` range.
const CJK: &str = r"\x{4E00}-\x{9FA5}";
const LATIN_DIGITS: &str = r"a-zA-Z0-9_";
const CYRILLIC: &str = r"\x{0400}-\x{04FF}";

fn latin_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"[^{LATIN_DIGITS}{CJK}\s]")).expect("valid separator pattern")
    })
}

fn cyrillic_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"[^{LATIN_DIGITS}{CYRILLIC}{CJK}\s]"))
            .expect("valid separator pattern")
    })
}

fn ideograph() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("[{CJK}]")).expect("valid ideograph pattern"))
}

/// Regex tokenizer splitting Latin and Cyrillic words on whitespace and CJK text per character.
///
/// Characters outside the alphabet (ASCII letters, digits, `_`, CJK ideographs and, when
/// enabled, Cyrillic) act as separators. Letter case is preserved.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultTokenizer {
    cfg: TokenizerConfig,
}

impl DefaultTokenizer {
    /// Creates a tokenizer for the supplied alphabet settings.
    #[must_use]
    pub fn new(cfg: TokenizerConfig) -> Self {
        Self { cfg }
    }

    /// Returns the alphabet settings.
    #[must_use]
    pub fn config(&self) -> &TokenizerConfig {
        &self.cfg
    }
}

impl Tokenizer for DefaultTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let separator = if self.cfg.cyrillic {
            cyrillic_separator()
        } else {
            latin_separator()
        };
        let sanitized = separator.replace_all(text, " ");
        let spaced = ideograph().replace_all(&sanitized, "$0 ");
        spaced.split_whitespace().map(str::to_owned).collect()
    }
}

impl fmt::Debug for DefaultTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultTokenizer")
            .field("cyrillic", &self.cfg.cyrillic)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        DefaultTokenizer::default().tokenize(text)
    }

    #[test]
    fn splits_latin_on_whitespace_and_punctuation() {
        assert_eq!(
            tokens("Hello, world!  foo_bar\tbaz42"),
            vec!["Hello", "world", "foo_bar", "baz42"]
        );
    }

    #[test]
    fn splits_cjk_into_single_characters() {
        assert_eq!(tokens("你好world"), vec!["你", "好", "world"]);
        assert_eq!(tokens("我想要，生命。"), vec!["我", "想", "要", "生", "命"]);
    }

    #[test]
    fn punctuation_only_text_yields_no_tokens() {
        assert!(tokens("?!... ,,, ---").is_empty());
        assert!(tokens("").is_empty());
    }

    #[test]
    fn cyrillic_is_configurable() {
        assert_eq!(tokens("привет мир"), vec!["привет", "мир"]);
        let latin_only = DefaultTokenizer::new(TokenizerConfig { cyrillic: false });
        assert!(latin_only.tokenize("привет мир").is_empty());
        assert_eq!(latin_only.tokenize("hi привет"), vec!["hi"]);
    }

    #[test]
    fn closures_implement_tokenizer() {
        let by_comma = |text: &str| text.split(',').map(str::to_owned).collect::<Vec<_>>();
        assert_eq!(by_comma.tokenize("a,b"), vec!["a", "b"]);
    }
}
