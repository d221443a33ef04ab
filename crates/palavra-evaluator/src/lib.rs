pub mod cache;
pub mod overlap;
pub mod quiz;
pub mod tfidf;

use std::collections::HashSet;
use std::sync::Arc;

use palavra_config::evaluator::EvaluatorConfig;
use palavra_core::language::LanguageProcessor;

pub use cache::VectorCache;
pub use quiz::{Quiz, QuizError};
pub use tfidf::{SparseVector, TfIdfModel, VectorizerSettings};

use self::overlap::stem_overlap;

#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("No terms left to build a vocabulary")]
    EmptyVocabulary,

    #[error("Text has no terms known to the model")]
    NoKnownTerms,
}

/// Scores of one answer against one definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// max of the two strategies, in [0, 1]
    pub score: f64,
    pub accepted: bool,
    pub vector_score: f64,
    pub overlap_score: f64,
}

impl Evaluation {
    fn rejected() -> Self {
        Self {
            score: 0.0,
            accepted: false,
            vector_score: 0.0,
            overlap_score: 0.0,
        }
    }
}

/// Free-text answer scoring: TF-IDF cosine fused with stem overlap.
///
/// Training takes `&mut self`; once trained the evaluator can be shared for
/// concurrent `evaluate` calls.
pub struct AnswerEvaluator {
    processor: Arc<dyn LanguageProcessor>,
    settings: VectorizerSettings,
    accept_threshold: f64,
    model: Option<TfIdfModel>,
    cache: VectorCache,
}

impl AnswerEvaluator {
    pub fn new(processor: Arc<dyn LanguageProcessor>, config: &EvaluatorConfig) -> Self {
        Self {
            processor,
            settings: VectorizerSettings::from(config),
            accept_threshold: config.accept_threshold,
            model: None,
            cache: VectorCache::new(),
        }
    }

    /// Fit the term-weighting model on a corpus snapshot.
    ///
    /// Blank and repeated definitions are skipped. A corpus that leaves no vocabulary
    /// puts the evaluator in untrained mode, where only stem overlap is scored.
    pub fn train<S: AsRef<str>>(&mut self, corpus: &[S]) {
        let mut seen = HashSet::new();
        let documents: Vec<String> = corpus
            .iter()
            .map(|text| self.processor.normalize(text.as_ref()))
            .filter(|text| !text.is_empty())
            .filter(|text| seen.insert(text.clone()))
            .collect();

        self.cache.clear();
        self.model = match TfIdfModel::fit(&documents, self.settings) {
            Ok(model) => {
                tracing::info!(
                    "Evaluator trained on {} definitions ({} terms)",
                    documents.len(),
                    model.vocabulary_size()
                );
                Some(model)
            }
            Err(e) => {
                tracing::warn!("{} - falling back to keyword scoring", e);
                None
            }
        };
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn accept_threshold(&self) -> f64 {
        self.accept_threshold
    }

    pub fn normalize(&self, text: &str) -> String {
        self.processor.normalize(text)
    }

    /// Number of definition vectors computed so far
    pub fn cached_vectors(&self) -> usize {
        self.cache.len()
    }

    pub fn evaluate(&self, answer: &str, correct_definition: &str) -> Evaluation {
        if answer.is_empty() || correct_definition.is_empty() {
            return Evaluation::rejected();
        }

        let answer = self.processor.normalize(answer);
        let definition = self.processor.normalize(correct_definition);
        if answer.is_empty() || definition.is_empty() {
            return Evaluation::rejected();
        }

        let vector_score = self.vector_score(&answer, &definition);
        let overlap_score = stem_overlap(self.processor.as_ref(), &answer, &definition);
        let score = vector_score.max(overlap_score);
        let accepted = score > self.accept_threshold;

        tracing::debug!(
            "Scored '{}' against '{}': tfidf={:.3} overlap={:.3} final={:.3} accepted={}",
            answer,
            definition,
            vector_score,
            overlap_score,
            score,
            accepted
        );

        Evaluation {
            score,
            accepted,
            vector_score,
            overlap_score,
        }
    }

    fn vector_score(&self, answer: &str, definition: &str) -> f64 {
        let Some(model) = &self.model else {
            return 0.0;
        };

        let definition_vector = match self
            .cache
            .get_or_try_insert(definition, || model.transform(definition))
        {
            Ok(vector) => vector,
            Err(e) => {
                tracing::debug!("Definition not vectorized: {}", e);
                return 0.0;
            }
        };

        match model.transform(answer) {
            Ok(answer_vector) => answer_vector.cosine(&definition_vector),
            Err(e) => {
                tracing::debug!("Answer not vectorized: {}", e);
                0.0
            }
        }
    }
}
