use std::collections::HashMap;
use std::path::Path;

use palavra_core::corpus::Corpus;
use palavra_core::error::CorpusError;
use palavra_types::{Category, Word, WordId};
use serde::Deserialize;

fn default_difficulty() -> u8 {
    1
}

// On-disk layout, decoded into records below
#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    categories: Vec<CategoryRow>,
    words: Vec<WordRow>,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: u32,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WordRow {
    id: WordId,
    word: String,
    definition: String,
    category_id: u32,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    #[serde(default)]
    sentences: Vec<String>,
    #[serde(default)]
    variations: Vec<String>,
}

/// Corpus plus the example sentences shipped with it
#[derive(Debug)]
pub struct LoadedCorpus {
    pub corpus: Corpus,
    pub sentences: HashMap<WordId, Vec<String>>,
}

pub struct CorpusLoader;

impl CorpusLoader {
    /// Load a corpus file; a missing file or empty word list is an error
    pub fn load_from_file(path: &Path) -> Result<LoadedCorpus, CorpusError> {
        tracing::info!("Loading corpus from file: {}", path.display());
        if !path.exists() {
            return Err(CorpusError::FileNotFound(path.display().to_string()));
        }

        let json = std::fs::read_to_string(path)?;
        let loaded = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} words in {} categories",
            loaded.corpus.len(),
            loaded.corpus.categories().len()
        );
        Ok(loaded)
    }

    pub fn from_json(json: &str) -> Result<LoadedCorpus, CorpusError> {
        let file: CorpusFile =
            serde_json::from_str(json).map_err(|e| CorpusError::ParseError(e.to_string()))?;

        let category_names: HashMap<u32, &str> = file
            .categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut words = Vec::with_capacity(file.words.len());
        let mut sentences = HashMap::new();

        for row in &file.words {
            let Some(category) = category_names.get(&row.category_id) else {
                return Err(CorpusError::InvalidFormat(format!(
                    "word '{}' references unknown category {}",
                    row.word, row.category_id
                )));
            };

            if row.definition.trim().is_empty() {
                tracing::warn!("Skipping '{}': empty definition", row.word);
                continue;
            }

            let examples: Vec<String> = row
                .sentences
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !examples.is_empty() {
                sentences.insert(row.id, examples);
            }

            words.push(Word {
                id: row.id,
                word: row.word.clone(),
                definition: row.definition.clone(),
                category: category.to_string(),
                difficulty: row.difficulty,
                variations: row.variations.clone(),
            });
        }

        let categories = file
            .categories
            .into_iter()
            .map(|c| Category {
                id: c.id,
                name: c.name,
                description: c.description,
            })
            .collect();

        Ok(LoadedCorpus {
            corpus: Corpus::non_empty(words, categories)?,
            sentences,
        })
    }
}
