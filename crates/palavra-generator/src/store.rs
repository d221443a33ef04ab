use std::collections::HashMap;

use palavra_types::WordId;
use parking_lot::Mutex;

/// Result of appending a sentence to a word's example set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// The same text is already stored for the word; nothing was written
    Duplicate,
    /// The word already holds `quota` sentences; nothing was written
    QuotaReached,
}

/// Persistence of example sentences, owned by the storage layer.
///
/// Implementations must make `append_sentence` atomic per word: the duplicate check, the
/// quota check and the write happen under the same lock or transaction.
#[async_trait::async_trait]
pub trait SentenceStore: Send + Sync {
    /// Stored sentences for a word, oldest first
    async fn list_sentences(&self, word_id: WordId) -> Result<Vec<String>, StoreError>;

    /// Append unless the text is already stored or the word holds `quota` sentences
    async fn append_sentence(
        &self,
        word_id: WordId,
        sentence: &str,
        quota: usize,
    ) -> Result<AppendOutcome, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Process-local store, mainly for tests and fallback runs
#[derive(Default)]
pub struct InMemorySentenceStore {
    sentences: Mutex<HashMap<WordId, Vec<String>>>,
}

impl InMemorySentenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentences(seed: HashMap<WordId, Vec<String>>) -> Self {
        Self {
            sentences: Mutex::new(seed),
        }
    }

    pub fn count(&self, word_id: WordId) -> usize {
        self.sentences.lock().get(&word_id).map_or(0, Vec::len)
    }
}

#[async_trait::async_trait]
impl SentenceStore for InMemorySentenceStore {
    async fn list_sentences(&self, word_id: WordId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .sentences
            .lock()
            .get(&word_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_sentence(
        &self,
        word_id: WordId,
        sentence: &str,
        quota: usize,
    ) -> Result<AppendOutcome, StoreError> {
        let mut sentences = self.sentences.lock();
        let entry = sentences.entry(word_id).or_default();

        if crate::validate::is_duplicate(sentence, entry) {
            return Ok(AppendOutcome::Duplicate);
        }
        if entry.len() >= quota {
            return Ok(AppendOutcome::QuotaReached);
        }

        entry.push(sentence.trim().to_string());
        Ok(AppendOutcome::Appended)
    }
}
