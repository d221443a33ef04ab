//! TF-IDF term weighting over normalized definitions.
//!
//! Tokens are runs of alphanumeric characters of at least `min_token_chars` characters;
//! terms are n-grams of consecutive tokens up to `max_ngram`. Weights use smoothed IDF,
//! `ln((1 + n) / (1 + df)) + 1`, and vectors are L2-normalized so cosine similarity is a
//! dot product.

use std::collections::{HashMap, HashSet};

use palavra_config::evaluator::EvaluatorConfig;

use crate::EvaluatorError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorizerSettings {
    pub min_token_chars: usize,
    pub max_ngram: usize,
    /// Terms in more than this share of documents are excluded
    pub max_df: f64,
}

impl Default for VectorizerSettings {
    fn default() -> Self {
        Self {
            min_token_chars: 3,
            max_ngram: 2,
            max_df: 0.9,
        }
    }
}

impl From<&EvaluatorConfig> for VectorizerSettings {
    fn from(config: &EvaluatorConfig) -> Self {
        Self {
            min_token_chars: config.min_token_chars,
            max_ngram: config.max_ngram.max(1),
            max_df: config.max_df,
        }
    }
}

/// Sparse L2-normalized vector, sorted by term index
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cosine similarity of two unit vectors, clamped to [0, 1]
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a) = self.entries[i];
            let (b_idx, b) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a * b;
                    i += 1;
                    j += 1;
                }
            }
        }

        dot.clamp(0.0, 1.0)
    }
}

/// Fitted vocabulary and IDF weights
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    settings: VectorizerSettings,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfModel {
    /// Fit on already normalized documents
    pub fn fit(documents: &[String], settings: VectorizerSettings) -> Result<Self, EvaluatorError> {
        if documents.is_empty() {
            return Err(EvaluatorError::EmptyVocabulary);
        }

        let n_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = terms(doc, &settings).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_doc_count = settings.max_df * n_docs as f64;
        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| (*df as f64) <= max_doc_count)
            .collect();

        if kept.is_empty() {
            return Err(EvaluatorError::EmptyVocabulary);
        }

        // stable indices regardless of hash order
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        tracing::debug!(
            "Fitted TF-IDF on {} documents, {} terms",
            n_docs,
            vocabulary.len()
        );

        Ok(Self {
            settings,
            vocabulary,
            idf,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Weighted unit vector for normalized text
    pub fn transform(&self, text: &str) -> Result<SparseVector, EvaluatorError> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms(text, &self.settings) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if entries.is_empty() || norm == 0.0 {
            return Err(EvaluatorError::NoKnownTerms);
        }

        for (_, w) in &mut entries {
            *w /= norm;
        }
        entries.sort_by_key(|(idx, _)| *idx);

        Ok(SparseVector { entries })
    }
}

/// Unigrams up to `max_ngram`-grams over qualifying tokens
fn terms(text: &str, settings: &VectorizerSettings) -> Vec<String> {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= settings.min_token_chars.max(1))
        .collect();

    let mut terms = Vec::new();
    for n in 1..=settings.max_ngram {
        if tokens.len() < n {
            break;
        }
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}
