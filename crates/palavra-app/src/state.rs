use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use palavra_config::Config;
use palavra_core::LanguageProcessor;
use palavra_evaluator::quiz::Quiz;
use palavra_generator::{PhraseGenerator, SentenceStore};
use palavra_lang_portuguese::{MistralGenerator, PortugueseProcessor};
use palavra_store::{CorpusLoader, JsonSentenceStore};

pub struct AppState {
    pub quiz: Quiz,
    pub phrases: PhraseGenerator,
    pub sentences: Arc<dyn SentenceStore>,
}

impl AppState {
    /// Load the corpus, open sentence storage and reach the generation provider.
    ///
    /// A missing or empty corpus is fatal. An unreachable provider only downgrades
    /// generation to fallback sentences.
    pub async fn load(config: Config) -> anyhow::Result<Self> {
        let corpus_path = Path::new(&config.storage.corpus_path);
        let loaded = CorpusLoader::load_from_file(corpus_path)
            .with_context(|| format!("failed to load corpus from {}", corpus_path.display()))?;

        let processor: Arc<dyn LanguageProcessor> = Arc::new(PortugueseProcessor::new());
        let quiz = Quiz::new(loaded.corpus, processor, &config.evaluator);
        if !quiz.evaluator().is_trained() {
            tracing::warn!("Corpus too small for vector scoring, using stem overlap only");
        }

        let sentences =
            JsonSentenceStore::open_with_seed(&config.storage.sentences_path, loaded.sentences)
                .await
                .with_context(|| {
                    format!("failed to open sentences at {}", config.storage.sentences_path)
                })?;

        let phrases = if config.generator.remote_enabled() {
            let generator = Arc::new(MistralGenerator::new(
                config.generator.api_key.clone(),
                config.generator.api_url.clone(),
                config.generator.model.clone(),
            ));
            PhraseGenerator::connect(generator, &config.generator).await
        } else {
            tracing::warn!("MISTRAL_API_KEY not set, using fallback sentences");
            PhraseGenerator::fallback_only(&config.generator)
        };

        Ok(Self::from_parts(quiz, phrases, Arc::new(sentences)))
    }

    pub fn from_parts(
        quiz: Quiz,
        phrases: PhraseGenerator,
        sentences: Arc<dyn SentenceStore>,
    ) -> Self {
        Self {
            quiz,
            phrases,
            sentences,
        }
    }
}
