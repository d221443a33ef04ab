pub mod backoff;
pub mod phrases;
pub mod prompt;
pub mod store;
pub mod validate;

pub use backoff::{BackoffPolicy, Exhausted, Sleeper, TokioSleeper, retry};
pub use phrases::{PhraseError, PhraseGenerator};
pub use store::{AppendOutcome, InMemorySentenceStore, SentenceStore, StoreError};

/// Text generation provider interface
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce raw text for a prompt
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Sentence already stored: {0}")]
    Duplicate(String),

    #[error("Generator unavailable")]
    Unavailable,
}
