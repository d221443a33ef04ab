use serde::{Deserialize, Serialize};

fn default_corpus_path() -> String {
    "data/palavras.json".to_string()
}

fn default_sentences_path() -> String {
    "data/frases.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    #[serde(default = "default_sentences_path")]
    pub sentences_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            sentences_path: default_sentences_path(),
        }
    }
}

impl StorageConfig {
    pub(crate) fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            corpus_path: lookup("CORPUS_PATH").unwrap_or_else(default_corpus_path),
            sentences_path: lookup("SENTENCES_PATH").unwrap_or_else(default_sentences_path),
        }
    }
}
