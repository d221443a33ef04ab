use std::collections::HashMap;

use palavra_types::{Category, Word};

use crate::error::CorpusError;

/// Snapshot of the known words, their definitions and categories
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    words: Vec<Word>,
    categories: Vec<Category>,
    word_index: HashMap<String, usize>,
}

impl Corpus {
    pub fn new(words: Vec<Word>, categories: Vec<Category>) -> Self {
        let mut word_index = HashMap::new();
        for (idx, word) in words.iter().enumerate() {
            // first entry wins on duplicated headwords
            word_index.entry(word.word.to_lowercase()).or_insert(idx);
        }

        Self {
            words,
            categories,
            word_index,
        }
    }

    /// Like [`Corpus::new`] but refuses an empty word list
    pub fn non_empty(words: Vec<Word>, categories: Vec<Category>) -> Result<Self, CorpusError> {
        if words.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self::new(words, categories))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Case-insensitive headword lookup
    pub fn find(&self, word: &str) -> Option<&Word> {
        self.word_index
            .get(&word.trim().to_lowercase())
            .map(|&idx| &self.words[idx])
    }

    /// Definition text for a headword
    pub fn definition_for(&self, word: &str) -> Option<&str> {
        self.find(word).map(|w| w.definition.as_str())
    }

    /// All definitions in corpus order, used to fit the term-weighting model
    pub fn definitions(&self) -> Vec<&str> {
        self.words.iter().map(|w| w.definition.as_str()).collect()
    }

    pub fn by_category<'a, 'b>(&'a self, category: &'b str) -> impl Iterator<Item = &'a Word> {
        self.words
            .iter()
            .filter(move |w| w.category.eq_ignore_ascii_case(category))
    }

    /// Pick a word, optionally restricted to one category. `seed` selects the entry.
    pub fn pick(&self, category: Option<&str>, seed: u64) -> Option<&Word> {
        let candidates: Vec<&Word> = match category {
            Some(name) => self.by_category(name).collect(),
            None => self.words.iter().collect(),
        };

        if candidates.is_empty() {
            tracing::debug!("No words available for category {:?}", category);
            return None;
        }

        let idx = (seed % candidates.len() as u64) as usize;
        Some(candidates[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: u32, word: &str, definition: &str, category: &str) -> Word {
        Word {
            id,
            word: word.to_string(),
            definition: definition.to_string(),
            category: category.to_string(),
            difficulty: 1,
            variations: vec![],
        }
    }

    fn sample() -> Corpus {
        Corpus::new(
            vec![
                word(1, "Macroglossia", "Aumento anormal da língua", "Medicina"),
                word(2, "Habeas Corpus", "Remédio constitucional", "Direito"),
                word(3, "Bacharelesco", "Que mostra erudição afetada", "Literatura"),
                word(4, "Efêmero", "Que dura pouco tempo", "Literatura"),
            ],
            vec![],
        )
    }

    #[test]
    fn find_is_case_insensitive() {
        let corpus = sample();
        assert_eq!(corpus.find("macroglossia").map(|w| w.id), Some(1));
        assert_eq!(corpus.find(" HABEAS CORPUS ").map(|w| w.id), Some(2));
        assert_eq!(
            corpus.definition_for("Efêmero"),
            Some("Que dura pouco tempo")
        );
        assert!(corpus.find("inexistente").is_none());
    }

    #[test]
    fn pick_respects_category() {
        let corpus = sample();
        for seed in 0..10 {
            let picked = corpus.pick(Some("literatura"), seed).unwrap();
            assert_eq!(picked.category, "Literatura");
        }
        assert!(corpus.pick(Some("Química"), 0).is_none());
        assert_eq!(corpus.pick(None, 5).map(|w| w.id), Some(2));
    }

    #[test]
    fn non_empty_rejects_empty() {
        assert!(matches!(
            Corpus::non_empty(vec![], vec![]),
            Err(CorpusError::Empty)
        ));
        assert_eq!(sample().definitions().len(), 4);
    }
}
