use std::sync::Arc;

use palavra_config::evaluator::EvaluatorConfig;
use palavra_core::corpus::Corpus;
use palavra_core::language::LanguageProcessor;
use palavra_types::{Feedback, Verdict};

use crate::AnswerEvaluator;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("Unknown word: {0}")]
    UnknownWord(String),
}

/// Game core: a corpus snapshot and an evaluator trained on it
pub struct Quiz {
    corpus: Corpus,
    evaluator: AnswerEvaluator,
    partial_threshold: f64,
}

impl Quiz {
    pub fn new(
        corpus: Corpus,
        processor: Arc<dyn LanguageProcessor>,
        config: &EvaluatorConfig,
    ) -> Self {
        let mut evaluator = AnswerEvaluator::new(processor, config);
        evaluator.train(&corpus.definitions());

        Self {
            corpus,
            evaluator,
            partial_threshold: config.partial_threshold,
        }
    }

    /// Swap in a new corpus snapshot and retrain on it
    pub fn retrain(&mut self, corpus: Corpus) {
        self.evaluator.train(&corpus.definitions());
        self.corpus = corpus;
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn evaluator(&self) -> &AnswerEvaluator {
        &self.evaluator
    }

    /// Check a guess for the definition of `word`
    pub fn check(&self, word: &str, answer: &str) -> Result<Verdict, QuizError> {
        let entry = self
            .corpus
            .find(word)
            .ok_or_else(|| QuizError::UnknownWord(word.to_string()))?;

        let normalized_answer = self.evaluator.normalize(answer);
        let matches_variation = !normalized_answer.is_empty()
            && entry
                .variations
                .iter()
                .any(|v| self.evaluator.normalize(v) == normalized_answer);

        let (similarity, accepted) = if matches_variation {
            tracing::debug!("'{}' matched an accepted variation of '{}'", answer, entry.word);
            (1.0, true)
        } else {
            let evaluation = self.evaluator.evaluate(answer, &entry.definition);
            (evaluation.score, evaluation.accepted)
        };

        let feedback = if accepted {
            Feedback::Correct
        } else if similarity > self.partial_threshold {
            Feedback::Partial
        } else {
            Feedback::Incorrect
        };

        Ok(Verdict {
            accepted,
            similarity,
            correct_definition: (!accepted).then(|| entry.definition.clone()),
            feedback,
        })
    }
}
