use std::collections::HashSet;

/// Text processing interface for language implementations
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code: "pt", "es", ...)
    fn language_code(&self) -> &str;

    /// Canonical comparable form, see [`crate::Normalizer`]
    fn normalize(&self, text: &str) -> String;

    /// Break already normalized text into word tokens
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .enumerate()
            .map(|(position, surface)| Token {
                surface: surface.to_string(),
                normalized: surface.to_string(),
                position,
            })
            .collect()
    }

    /// Reduce a single word to its root form
    fn stem(&self, word: &str) -> String;

    /// Set of stems for already normalized text
    fn stems(&self, text: &str) -> HashSet<String> {
        self.tokenize(text)
            .iter()
            .map(|token| self.stem(&token.normalized))
            .filter(|stem| !stem.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub surface: String,
    pub normalized: String,
    pub position: usize,
}
