use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use palavra_generator::validate::is_duplicate;
use palavra_generator::{AppendOutcome, SentenceStore, StoreError};
use palavra_types::WordId;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// Example sentences kept in a JSON file keyed by word id.
///
/// Every append rewrites the whole file through a temp file in the same directory, so a
/// crash never leaves a half-written file behind. The lock is held across the write, which
/// keeps the duplicate check, the quota check and the persist atomic per store.
pub struct JsonSentenceStore {
    path: PathBuf,
    sentences: Mutex<BTreeMap<WordId, Vec<String>>>,
}

impl JsonSentenceStore {
    /// Open the store at `path`; a missing file starts empty
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let sentences = match tokio::fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No sentence file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            sentences: Mutex::new(sentences),
        })
    }

    /// Open the store and merge in sentences shipped with the corpus.
    ///
    /// Seeded sentences are only written to disk on the next successful append.
    pub async fn open_with_seed(
        path: impl Into<PathBuf>,
        seed: HashMap<WordId, Vec<String>>,
    ) -> Result<Self, StoreError> {
        let store = Self::open(path).await?;
        {
            let mut sentences = store.sentences.lock().await;
            for (word_id, seeded) in seed {
                let entry = sentences.entry(word_id).or_default();
                for sentence in seeded {
                    if !is_duplicate(&sentence, entry) {
                        entry.push(sentence.trim().to_string());
                    }
                }
            }
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, sentences: &BTreeMap<WordId, Vec<String>>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(sentences)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))??;
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(contents)?;
    temp_file.flush()?;
    temp_file.persist(path)?;
    Ok(())
}

#[async_trait::async_trait]
impl SentenceStore for JsonSentenceStore {
    async fn list_sentences(&self, word_id: WordId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .sentences
            .lock()
            .await
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
        let mut sentences = self.sentences.lock().await;
        let entry = sentences.entry(word_id).or_default();

        if is_duplicate(sentence, entry) {
            return Ok(AppendOutcome::Duplicate);
        }
        if entry.len() >= quota {
            return Ok(AppendOutcome::QuotaReached);
        }
        entry.push(sentence.trim().to_string());

        if let Err(e) = self.persist(&sentences).await {
            // Keep memory in step with disk
            if let Some(entry) = sentences.get_mut(&word_id) {
                entry.pop();
            }
            tracing::error!("Failed to persist sentence for word {}: {}", word_id, e);
            return Err(e);
        }

        tracing::debug!("Stored sentence for word {}", word_id);
        Ok(AppendOutcome::Appended)
    }
}
