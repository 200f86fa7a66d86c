//! Text featurization.
//!
//! Turns a post body into the bag of word n-grams the classifier counts.

use serde::{Deserialize, Serialize};

/// Word n-gram extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Featurizer {
    /// Emit adjacent word pairs in addition to single words.
    pub use_bigrams: bool,
}

impl Default for Featurizer {
    fn default() -> Self {
        Self { use_bigrams: true }
    }
}

/// Lowercase and split on anything that isn't a letter or digit.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

impl Featurizer {
    pub fn new(use_bigrams: bool) -> Self {
        Self { use_bigrams }
    }

    /// Extract features from a text. Repeated n-grams are repeated in the output.
    pub fn features(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        let mut features = Vec::with_capacity(tokens.len() * 2);

        if self.use_bigrams {
            features.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        }
        features.extend(tokens);

        features
    }
}
