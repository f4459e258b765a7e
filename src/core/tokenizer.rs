//! Token counting - precise BPE counts with a word-split fallback
//!
//! The bundle records which tokenizer produced its numbers ("cl100k_base" or
//! "words_approx"), so downstream consumers can tell precise counts from
//! approximations.
//!
//! Usage:
//! ```rust,ignore
//! use crate::core::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::auto();
//! let tokens = tokenizer.count("Hello world");
//! ```

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, CoreBPE};

// Lazy-initialized BPE encoding (loaded once on first use)
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("failed to load cl100k_base: {}", e)));

/// Tokenizer capability injected into the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tokenizer {
    /// cl100k_base BPE encoding (GPT-4, used as a Claude approximation)
    #[default]
    Cl100k,
    /// Whitespace-split word counting; fast and always available
    WordsApprox,
}

impl Tokenizer {
    /// Prefer the precise tokenizer, falling back to word counting when the
    /// BPE tables cannot be loaded
    pub fn auto() -> Self {
        match &*CL100K_BPE {
            Ok(_) => Tokenizer::Cl100k,
            Err(_) => Tokenizer::WordsApprox,
        }
    }

    /// Identifier written verbatim into the bundle summary
    pub fn name(self) -> &'static str {
        match self {
            Tokenizer::Cl100k => "cl100k_base",
            Tokenizer::WordsApprox => "words_approx",
        }
    }

    /// Count tokens in text
    pub fn count(self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        match self {
            Tokenizer::Cl100k => match &*CL100K_BPE {
                Ok(bpe) => bpe.encode_with_special_tokens(text).len(),
                Err(_) => count_words(text),
            },
            Tokenizer::WordsApprox => count_words(text),
        }
    }
}

impl fmt::Display for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Tokenizer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Tokenizer::auto()),
            "cl100k" | "cl100k_base" | "precise" => Ok(Tokenizer::Cl100k),
            "words" | "words_approx" | "approx" => Ok(Tokenizer::WordsApprox),
            _ => Err(format!(
                "Unknown tokenizer: {}. Available: auto, cl100k, words",
                s
            )),
        }
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
