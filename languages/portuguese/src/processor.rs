use palavra_core::language::LanguageProcessor;
use palavra_core::preprocess::{DefaultNormalizer, Normalizer};
use rust_stemmers::{Algorithm, Stemmer};

/// Portuguese text processor: shared normalization plus Snowball stemming
pub struct PortugueseProcessor {
    stemmer: Stemmer,
}

impl PortugueseProcessor {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::Portuguese),
        }
    }
}

impl Default for PortugueseProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageProcessor for PortugueseProcessor {
    fn language_code(&self) -> &str {
        "pt"
    }

    fn normalize(&self, text: &str) -> String {
        DefaultNormalizer.normalize(text)
    }

    fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }
}
