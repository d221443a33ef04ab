use std::sync::Arc;

use palavra_config::generator::GeneratorConfig;
use palavra_types::{ExampleSentence, SentenceSource, Word};

use crate::backoff::{BackoffPolicy, Exhausted, Sleeper, TokioSleeper, retry};
use crate::store::{AppendOutcome, SentenceStore, StoreError};
use crate::validate::{fallback_sentence, fill_with_templates, is_duplicate, split_sentences};
use crate::{GenerateError, TextGenerator, prompt};

#[derive(Debug, thiserror::Error)]
pub enum PhraseError {
    #[error("Failed to persist sentence: {0}")]
    Storage(#[from] StoreError),
}

impl PhraseError {
    /// Nothing was counted against the word's quota; the call can be repeated
    pub fn is_retryable(&self) -> bool {
        matches!(self, PhraseError::Storage(_))
    }
}

enum Backend {
    Remote(Arc<dyn TextGenerator>),
    FallbackOnly,
}

/// Example sentence generation around an unreliable text generator
pub struct PhraseGenerator {
    backend: Backend,
    policy: BackoffPolicy,
    sleeper: Arc<dyn Sleeper>,
    quota: usize,
    temperature: f32,
}

impl PhraseGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &GeneratorConfig) -> Self {
        Self::with_backend(Backend::Remote(generator), config)
    }

    /// Generator that never calls out and only produces template sentences
    pub fn fallback_only(config: &GeneratorConfig) -> Self {
        Self::with_backend(Backend::FallbackOnly, config)
    }

    /// Probe the provider once; an unreachable provider yields a fallback-only generator
    pub async fn connect(generator: Arc<dyn TextGenerator>, config: &GeneratorConfig) -> Self {
        let name = generator.metadata().name;
        match generator.generate(&prompt::connection_probe()).await {
            Ok(reply) if !reply.trim().is_empty() => {
                tracing::info!("Text generator {} initialized", name);
                Self::new(generator, config)
            }
            Ok(_) => {
                tracing::warn!(
                    "Text generator {} returned an empty probe reply, using fallback sentences",
                    name
                );
                Self::fallback_only(config)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize text generator {}: {}, using fallback sentences",
                    name,
                    e
                );
                Self::fallback_only(config)
            }
        }
    }

    fn with_backend(backend: Backend, config: &GeneratorConfig) -> Self {
        Self {
            backend,
            policy: BackoffPolicy::from_config(config),
            sleeper: Arc::new(TokioSleeper),
            quota: config.sentence_quota,
            temperature: config.temperature,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn is_fallback_only(&self) -> bool {
        matches!(self.backend, Backend::FallbackOnly)
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// One example sentence; never fails, falls back to a template
    pub async fn generate_one(&self, word: &str, definition: &str, category: &str) -> String {
        match self.request_one(word, definition, category, &[]).await {
            Ok(sentence) => sentence,
            Err(exhausted) => {
                tracing::warn!("Using fallback sentence for '{}': {}", word, exhausted);
                fallback_sentence(word)
            }
        }
    }

    /// Three example sentences, padded with templates when the model gives fewer
    pub async fn generate_three(&self, word: &str, definition: &str, category: &str) -> Vec<String> {
        let sentences = self.request_three(word, definition, category).await;
        fill_with_templates(word, sentences, 3)
    }

    /// Grow the word's example set by one sentence, honoring the quota.
    ///
    /// At quota the most recent stored sentence is returned without calling the
    /// generator. Otherwise a new non-duplicate sentence is generated and appended to
    /// the store. When generation fails a fallback sentence is returned but not stored,
    /// so the slot stays open for a later successful call.
    pub async fn next_example(
        &self,
        store: &dyn SentenceStore,
        word: &Word,
    ) -> Result<ExampleSentence, PhraseError> {
        let existing = store.list_sentences(word.id).await?;

        if existing.len() >= self.quota {
            tracing::debug!(
                "'{}' already has {} sentences (quota {})",
                word.word,
                existing.len(),
                self.quota
            );
            return Ok(self.stored_example(&word.word, existing));
        }

        let text = match self
            .request_one(&word.word, &word.definition, &word.category, &existing)
            .await
        {
            Ok(sentence) => sentence,
            Err(exhausted) => {
                tracing::warn!("Using fallback sentence for '{}': {}", word.word, exhausted);
                return Ok(ExampleSentence {
                    text: fallback_sentence(&word.word),
                    source: SentenceSource::Fallback,
                    persisted: false,
                    remaining: self.quota - existing.len(),
                });
            }
        };

        match store.append_sentence(word.id, &text, self.quota).await {
            Ok(AppendOutcome::Appended) => Ok(ExampleSentence {
                text,
                source: SentenceSource::Generated,
                persisted: true,
                remaining: self.quota.saturating_sub(existing.len() + 1),
            }),
            Ok(AppendOutcome::Duplicate) => {
                tracing::debug!("Sentence for '{}' was stored concurrently", word.word);
                Ok(ExampleSentence {
                    text,
                    source: SentenceSource::Generated,
                    persisted: false,
                    remaining: self.quota.saturating_sub(existing.len() + 1),
                })
            }
            Ok(AppendOutcome::QuotaReached) => {
                tracing::debug!("'{}' reached its quota concurrently", word.word);
                let current = store.list_sentences(word.id).await?;
                Ok(self.stored_example(&word.word, current))
            }
            Err(e) => {
                tracing::error!("Failed to store sentence for '{}': {}", word.word, e);
                Err(e.into())
            }
        }
    }

    /// Give a word with no stored sentences its initial examples.
    ///
    /// Only sentences returned by the model are stored; the result is padded with
    /// unstored templates up to three for display. If an append fails part way, the
    /// sentences already stored stay and the word is not seeded again; `next_example`
    /// keeps growing it from there.
    pub async fn seed_examples(
        &self,
        store: &dyn SentenceStore,
        word: &Word,
    ) -> Result<Vec<String>, PhraseError> {
        let existing = store.list_sentences(word.id).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let generated = self
            .request_three(&word.word, &word.definition, &word.category)
            .await;

        for sentence in &generated {
            match store.append_sentence(word.id, sentence, self.quota).await? {
                AppendOutcome::Appended => {}
                AppendOutcome::Duplicate => {
                    tracing::debug!("Skipping repeated sentence for '{}'", word.word);
                }
                AppendOutcome::QuotaReached => break,
            }
        }

        let stored = store.list_sentences(word.id).await?;
        Ok(fill_with_templates(&word.word, stored, 3))
    }

    fn stored_example(&self, word: &str, stored: Vec<String>) -> ExampleSentence {
        let text = stored
            .last()
            .cloned()
            .unwrap_or_else(|| fallback_sentence(word));
        ExampleSentence {
            text,
            source: SentenceSource::Stored,
            persisted: false,
            remaining: 0,
        }
    }

    /// Model sentences only, empty when the provider is unavailable or exhausted
    async fn request_three(&self, word: &str, definition: &str, category: &str) -> Vec<String> {
        let Backend::Remote(generator) = &self.backend else {
            return Vec::new();
        };

        let request = &prompt::three_sentences(word, definition, category, self.temperature);
        let result = retry(&self.policy, self.sleeper.as_ref(), |attempt| {
            async move {
                tracing::debug!("Requesting three sentences for '{}' (attempt {})", word, attempt);
                let raw = generator.generate(request).await?;
                let sentences = split_sentences(&raw, 3);
                if sentences.is_empty() {
                    return Err(GenerateError::EmptyResponse);
                }
                Ok(sentences)
            }
        })
        .await;

        result.unwrap_or_else(|exhausted| {
            tracing::warn!("Using template sentences for '{}': {}", word, exhausted);
            Vec::new()
        })
    }

    async fn request_one(
        &self,
        word: &str,
        definition: &str,
        category: &str,
        existing: &[String],
    ) -> Result<String, Exhausted<GenerateError>> {
        let Backend::Remote(generator) = &self.backend else {
            return Err(Exhausted {
                attempts: 0,
                last_error: GenerateError::Unavailable,
            });
        };

        let request = &prompt::single_sentence(word, definition, category, self.temperature);
        retry(&self.policy, self.sleeper.as_ref(), |attempt| {
            async move {
                tracing::debug!("Requesting sentence for '{}' (attempt {})", word, attempt);
                let raw = generator.generate(request).await?;
                let sentence = split_sentences(&raw, 1)
                    .pop()
                    .ok_or(GenerateError::EmptyResponse)?;
                if is_duplicate(&sentence, existing) {
                    return Err(GenerateError::Duplicate(sentence));
                }
                Ok(sentence)
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use palavra_types::WordId;
    use parking_lot::Mutex;

    use super::*;
    use crate::GenerationRequest;
    use crate::ProviderMetadata;
    use crate::backoff::tests::RecordingSleeper;
    use crate::store::InMemorySentenceStore;

    /// Replays scripted replies, then fails
    #[derive(Default)]
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<String, GenerateError>>>,
        repeat: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn replying(replies: Vec<Result<String, GenerateError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            }
        }

        fn always(reply: &str) -> Self {
            Self {
                repeat: Some(reply.to_string()),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // let concurrent callers interleave like a real network call
            tokio::task::yield_now().await;
            if let Some(reply) = self.replies.lock().pop_front() {
                return reply;
            }
            match &self.repeat {
                Some(reply) => Ok(reply.clone()),
                None => Err(GenerateError::ApiError("service down".to_string())),
            }
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "scripted".to_string(),
                model: "test".to_string(),
                requires_api_key: false,
            }
        }
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl SentenceStore for BrokenStore {
        async fn list_sentences(&self, _word_id: WordId) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }

        async fn append_sentence(
            &self,
            _word_id: WordId,
            _sentence: &str,
            _quota: usize,
        ) -> Result<AppendOutcome, StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }
    }

    /// Accepts a fixed number of appends, then fails
    struct FlakyStore {
        inner: InMemorySentenceStore,
        accepted: AtomicUsize,
        limit: usize,
    }

    #[async_trait::async_trait]
    impl SentenceStore for FlakyStore {
        async fn list_sentences(&self, word_id: WordId) -> Result<Vec<String>, StoreError> {
            self.inner.list_sentences(word_id).await
        }

        async fn append_sentence(
            &self,
            word_id: WordId,
            sentence: &str,
            quota: usize,
        ) -> Result<AppendOutcome, StoreError> {
            if self.accepted.fetch_add(1, Ordering::SeqCst) >= self.limit {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.append_sentence(word_id, sentence, quota).await
        }
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            api_key: "test".to_string(),
            ..Default::default()
        }
    }

    fn resiliente() -> Word {
        Word {
            id: 1,
            word: "Resiliente".to_string(),
            definition: "Capaz de se recuperar facilmente de situações difíceis".to_string(),
            category: "Adjetivos".to_string(),
            difficulty: 3,
            variations: vec![],
        }
    }

    fn generator_with(
        scripted: &Arc<ScriptedGenerator>,
        sleeper: &Arc<RecordingSleeper>,
    ) -> PhraseGenerator {
        PhraseGenerator::new(scripted.clone(), &config()).with_sleeper(sleeper.clone())
    }

    fn stored(sentences: &[&str]) -> InMemorySentenceStore {
        let sentences = sentences.iter().map(|s| s.to_string()).collect();
        InMemorySentenceStore::with_sentences(HashMap::from([(1, sentences)]))
    }

    #[tokio::test]
    async fn quota_reached_returns_latest_without_calling_out() {
        let scripted = Arc::new(ScriptedGenerator::always("Nunca usada."));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = stored(&["Um.", "Dois.", "Três.", "Quatro."]);

        let example = phrases.next_example(&store, &resiliente()).await.unwrap();

        assert_eq!(example.text, "Quatro.");
        assert_eq!(example.source, SentenceSource::Stored);
        assert_eq!(example.remaining, 0);
        assert!(!example.persisted);
        assert_eq!(scripted.calls(), 0);
        assert_eq!(store.count(1), 4);
    }

    #[tokio::test]
    async fn generated_sentence_is_persisted_once() {
        let scripted = Arc::new(ScriptedGenerator::replying(vec![Ok(
            "\n Mesmo após a enchente, a comunidade resiliente reconstruiu tudo. \n".to_string(),
        )]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = stored(&["Ela é uma pessoa resiliente."]);

        let example = phrases.next_example(&store, &resiliente()).await.unwrap();

        assert_eq!(
            example.text,
            "Mesmo após a enchente, a comunidade resiliente reconstruiu tudo."
        );
        assert_eq!(example.source, SentenceSource::Generated);
        assert!(example.persisted);
        assert_eq!(example.remaining, 2);
        assert_eq!(store.count(1), 2);
        assert!(sleeper.delays.lock().is_empty());
    }

    #[tokio::test]
    async fn duplicate_reply_is_retried() {
        let scripted = Arc::new(ScriptedGenerator::replying(vec![
            Ok("Ela é uma pessoa resiliente.".to_string()),
            Ok("   ".to_string()),
            Ok("O time resiliente virou o jogo.".to_string()),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = stored(&["Ela é uma pessoa resiliente."]);

        let example = phrases.next_example(&store, &resiliente()).await.unwrap();

        assert_eq!(example.text, "O time resiliente virou o jogo.");
        assert_eq!(scripted.calls(), 3);
        assert_eq!(
            *sleeper.delays.lock(),
            [Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn exhausted_service_falls_back() {
        let scripted = Arc::new(ScriptedGenerator::failing());
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = InMemorySentenceStore::new();

        let example = phrases.next_example(&store, &resiliente()).await.unwrap();

        assert_eq!(example.text, "Exemplo usando a palavra 'Resiliente'.");
        assert_eq!(example.source, SentenceSource::Fallback);
        assert!(!example.persisted);
        assert_eq!(example.remaining, 4);
        assert_eq!(scripted.calls(), 5);
        assert_eq!(sleeper.delays.lock().len(), 4);

        // the slot stays open, so the next call asks the service again
        let again = phrases.next_example(&store, &resiliente()).await.unwrap();
        assert_eq!(again.text, example.text);
        assert!(!again.persisted);
        assert_eq!(store.count(1), 0);
        assert_eq!(scripted.calls(), 10);
    }

    #[tokio::test]
    async fn repeated_calls_respect_quota_and_uniqueness() {
        let scripted = Arc::new(ScriptedGenerator::always("A mesma frase resiliente."));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = InMemorySentenceStore::new();

        for _ in 0..8 {
            phrases.next_example(&store, &resiliente()).await.unwrap();
        }

        let sentences = store.list_sentences(1).await.unwrap();
        assert!(sentences.len() <= phrases.quota());
        assert_eq!(sentences, ["A mesma frase resiliente."]);
    }

    #[tokio::test]
    async fn concurrent_calls_never_exceed_quota() {
        let scripted = Arc::new(ScriptedGenerator::replying(vec![
            Ok("Primeira resposta resiliente.".to_string()),
            Ok("Segunda resposta resiliente.".to_string()),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = stored(&["Um.", "Dois.", "Três."]);
        let word = resiliente();

        let (a, b) = tokio::join!(
            phrases.next_example(&store, &word),
            phrases.next_example(&store, &word)
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(scripted.calls(), 2);
        assert_eq!(store.count(1), phrases.quota());
        assert!(a.persisted ^ b.persisted);
        let late = if a.persisted { &b } else { &a };
        assert_eq!(late.source, SentenceSource::Stored);
        assert_eq!(late.remaining, 0);
    }

    #[tokio::test]
    async fn quota_fills_up_then_stops() {
        let scripted = Arc::new(ScriptedGenerator::replying(
            (1..=6).map(|i| Ok(format!("Frase número {i}."))).collect(),
        ));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = InMemorySentenceStore::new();

        let mut remaining = Vec::new();
        for _ in 0..6 {
            let example = phrases.next_example(&store, &resiliente()).await.unwrap();
            remaining.push(example.remaining);
        }

        assert_eq!(remaining, [3, 2, 1, 0, 0, 0]);
        assert_eq!(store.count(1), 4);
        assert_eq!(scripted.calls(), 4);
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced() {
        let scripted = Arc::new(ScriptedGenerator::always("Uma frase nova."));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);

        let err = phrases.next_example(&BrokenStore, &resiliente()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn generate_three_pads_short_replies() {
        let scripted = Arc::new(ScriptedGenerator::replying(vec![Ok(
            "Só uma frase resiliente.\n\n".to_string(),
        )]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);

        let sentences = phrases
            .generate_three("Resiliente", "Capaz de se recuperar", "Adjetivos")
            .await;

        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "Só uma frase resiliente.");
        assert!(sentences[1..].iter().all(|s| s.contains("'Resiliente'")));
        assert_ne!(sentences[1], sentences[2]);
    }

    #[tokio::test]
    async fn fallback_only_never_calls_out() {
        let phrases = PhraseGenerator::fallback_only(&config());
        assert!(phrases.is_fallback_only());

        let one = phrases.generate_one("Efêmero", "Que dura pouco", "Adjetivos").await;
        assert_eq!(one, "Exemplo usando a palavra 'Efêmero'.");

        let three = phrases.generate_three("Efêmero", "Que dura pouco", "Adjetivos").await;
        assert_eq!(three.len(), 3);
    }

    #[tokio::test]
    async fn failed_probe_switches_to_fallback() {
        let scripted = Arc::new(ScriptedGenerator::failing());
        let phrases = PhraseGenerator::connect(scripted.clone(), &config()).await;
        assert!(phrases.is_fallback_only());
        assert_eq!(scripted.calls(), 1);

        let healthy = Arc::new(ScriptedGenerator::always("ok"));
        assert!(!PhraseGenerator::connect(healthy, &config()).await.is_fallback_only());
    }

    #[tokio::test]
    async fn seed_examples_stores_three() {
        let scripted = Arc::new(ScriptedGenerator::replying(vec![Ok(
            "Primeira resiliente.\nSegunda resiliente.\nTerceira resiliente.\nQuarta.".to_string(),
        )]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = InMemorySentenceStore::new();

        let seeded = phrases.seed_examples(&store, &resiliente()).await.unwrap();
        assert_eq!(
            seeded,
            [
                "Primeira resiliente.",
                "Segunda resiliente.",
                "Terceira resiliente."
            ]
        );

        // already seeded, no further calls
        phrases.seed_examples(&store, &resiliente()).await.unwrap();
        assert_eq!(scripted.calls(), 1);
    }

    #[tokio::test]
    async fn templates_are_shown_but_not_stored() {
        let store = InMemorySentenceStore::new();
        let offline = PhraseGenerator::fallback_only(&config());

        let seeded = offline.seed_examples(&store, &resiliente()).await.unwrap();
        assert_eq!(seeded.len(), 3);
        assert_eq!(
            seeded[0],
            "Esta é uma frase de exemplo usando a palavra 'Resiliente'."
        );
        let fallback = offline.next_example(&store, &resiliente()).await.unwrap();
        assert!(!fallback.persisted);
        assert_eq!(store.count(1), 0);

        // once a working provider is configured the word still gets real sentences
        let scripted = Arc::new(ScriptedGenerator::replying(vec![
            Ok("Primeira resiliente.\nSegunda resiliente.".to_string()),
            Ok("Terceira resiliente.".to_string()),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let online = generator_with(&scripted, &sleeper);

        let seeded = online.seed_examples(&store, &resiliente()).await.unwrap();
        assert_eq!(seeded[..2], ["Primeira resiliente.", "Segunda resiliente."]);
        assert_eq!(store.count(1), 2);

        let example = online.next_example(&store, &resiliente()).await.unwrap();
        assert_eq!(example.text, "Terceira resiliente.");
        assert!(example.persisted);
        assert_eq!(store.count(1), 3);
    }

    #[tokio::test]
    async fn partial_seed_keeps_growing() {
        let scripted = Arc::new(ScriptedGenerator::replying(vec![
            Ok("Primeira resiliente.\nSegunda resiliente.\nTerceira resiliente.".to_string()),
            Ok("Quarta resiliente.".to_string()),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let phrases = generator_with(&scripted, &sleeper);
        let store = FlakyStore {
            inner: InMemorySentenceStore::new(),
            accepted: AtomicUsize::new(0),
            limit: 1,
        };

        let err = phrases.seed_examples(&store, &resiliente()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.inner.count(1), 1);

        // no reseed over the partial set
        let seeded = phrases.seed_examples(&store, &resiliente()).await.unwrap();
        assert_eq!(seeded[0], "Primeira resiliente.");
        assert_eq!(scripted.calls(), 1);

        store.accepted.store(0, Ordering::SeqCst);
        let example = phrases.next_example(&store, &resiliente()).await.unwrap();
        assert_eq!(example.text, "Quarta resiliente.");
        assert!(example.persisted);
        assert_eq!(store.inner.count(1), 2);
    }
}
