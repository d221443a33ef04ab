use palavra_evaluator::quiz::QuizError;
use palavra_types::{Feedback, Verdict, Word};

use crate::state::AppState;

/// Example sentences shown with each word
pub const CONTEXT_SENTENCES: usize = 2;

#[derive(Debug, Clone)]
pub struct Question {
    pub word: Word,
    pub context: Vec<String>,
}

/// Pick a word and gather its context sentences.
///
/// Storage failures are logged and the round goes on with whatever sentences are at hand.
pub async fn prepare_round(
    state: &AppState,
    category: Option<&str>,
    seed: u64,
) -> Option<Question> {
    let word = state.quiz.corpus().pick(category, seed)?.clone();
    Some(question_for(state, word).await)
}

/// Same as [`prepare_round`] for a word chosen by name
pub async fn prepare_word(state: &AppState, name: &str) -> Option<Question> {
    let word = state.quiz.corpus().find(name)?.clone();
    Some(question_for(state, word).await)
}

async fn question_for(state: &AppState, word: Word) -> Question {
    let store = state.sentences.as_ref();

    let mut sentences = match state.phrases.seed_examples(store, &word).await {
        Ok(sentences) => sentences,
        Err(e) => {
            tracing::warn!("Could not seed sentences for '{}': {}", word.word, e);
            Vec::new()
        }
    };

    match state.phrases.next_example(store, &word).await {
        Ok(example) => {
            if !sentences.contains(&example.text) {
                sentences.push(example.text);
            }
        }
        Err(e) => tracing::warn!("Could not grow sentences for '{}': {}", word.word, e),
    }

    let skip = sentences.len().saturating_sub(CONTEXT_SENTENCES);
    Question {
        context: sentences.split_off(skip),
        word,
    }
}

pub fn answer_round(
    state: &AppState,
    question: &Question,
    answer: &str,
) -> Result<Verdict, QuizError> {
    state.quiz.check(&question.word.word, answer)
}

/// Running tally for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub rounds: u32,
    pub correct: u32,
    pub partial: u32,
}

impl Scoreboard {
    pub fn record(&mut self, verdict: &Verdict) {
        self.rounds += 1;
        match verdict.feedback {
            Feedback::Correct => self.correct += 1,
            Feedback::Partial => self.partial += 1,
            Feedback::Incorrect => {}
        }
    }

    /// Share of accepted answers, 0.0 before the first round
    pub fn accuracy(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.rounds)
    }
}
