use async_trait::async_trait;
use palavra_generator::{GenerateError, GenerationRequest, ProviderMetadata, TextGenerator};
use serde::{Deserialize, Serialize};

/// Chat-completions client for Mistral (or any OpenAI-compatible endpoint)
#[derive(Clone)]
pub struct MistralGenerator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl MistralGenerator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// First choice's content, if any non-blank text came back
fn extract_content(response: ChatResponse) -> Result<String, GenerateError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerateError::EmptyResponse)
}

#[async_trait]
impl TextGenerator for MistralGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::AuthenticationError);
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(GenerateError::RateLimitExceeded);
        }

        if response.status() == 401 || response.status() == 403 {
            return Err(GenerateError::AuthenticationError);
        }

        if !response.status().is_success() {
            return Err(GenerateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            GenerateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        extract_content(parsed)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Mistral".to_string(),
            model: self.model.clone(),
            requires_api_key: true,
        }
    }
}
