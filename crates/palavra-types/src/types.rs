use serde::{Deserialize, Serialize};

pub type WordId = u32;

/// A vocabulary entry as seen by the quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub word: String,
    pub definition: String,
    pub category: String,
    pub difficulty: u8,
    /// Alternative answers accepted verbatim (after normalization)
    #[serde(default)]
    pub variations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
}

/// Outcome of checking one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    pub similarity: f64,
    /// Only filled in when the answer was rejected
    pub correct_definition: Option<String>,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Partial,
    Incorrect,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Correct => "Resposta aceita!",
            Feedback::Partial => "Resposta parcialmente correta",
            Feedback::Incorrect => "Resposta incorreta",
        }
    }
}

/// Where an example sentence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentenceSource {
    /// Already stored, quota reached
    Stored,
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub text: String,
    pub source: SentenceSource,
    /// Whether this call appended `text` to the word's sentence set
    pub persisted: bool,
    /// Sentences still allowed for the word after this call
    pub remaining: usize,
}
