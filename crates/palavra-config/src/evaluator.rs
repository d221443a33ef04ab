use serde::{Deserialize, Serialize};

use crate::parsed;

fn default_accept_threshold() -> f64 {
    0.5
}

fn default_partial_threshold() -> f64 {
    0.2
}

fn default_max_df() -> f64 {
    0.9
}

fn default_min_token_chars() -> usize {
    3
}

fn default_max_ngram() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Answers scoring strictly above this are accepted
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,
    /// Rejected answers above this are reported as partially correct
    #[serde(default = "default_partial_threshold")]
    pub partial_threshold: f64,
    /// Terms present in more than this share of definitions are dropped
    #[serde(default = "default_max_df")]
    pub max_df: f64,
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            accept_threshold: default_accept_threshold(),
            partial_threshold: default_partial_threshold(),
            max_df: default_max_df(),
            min_token_chars: default_min_token_chars(),
            max_ngram: default_max_ngram(),
        }
    }
}

impl EvaluatorConfig {
    pub(crate) fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            accept_threshold: parsed(lookup, "ACCEPT_THRESHOLD")
                .unwrap_or_else(default_accept_threshold),
            partial_threshold: parsed(lookup, "PARTIAL_THRESHOLD")
                .unwrap_or_else(default_partial_threshold),
            max_df: parsed(lookup, "TFIDF_MAX_DF").unwrap_or_else(default_max_df),
            min_token_chars: parsed(lookup, "TFIDF_MIN_TOKEN_CHARS")
                .unwrap_or_else(default_min_token_chars),
            max_ngram: parsed(lookup, "TFIDF_MAX_NGRAM").unwrap_or_else(default_max_ngram),
        }
    }
}
