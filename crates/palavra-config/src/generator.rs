use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parsed;

fn default_api_url() -> String {
    "https://api.mistral.ai/v1".to_string()
}

fn default_model() -> String {
    "mistral-tiny".to_string()
}

fn default_sentence_quota() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Empty key means fallback-only generation
    #[serde(default)]
    pub api_key: String,
    /// Base URL of an OpenAI-compatible chat completions API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Max stored example sentences per word
    #[serde(default = "default_sentence_quota")]
    pub sentence_quota: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after the first failed attempt, doubled on each further failure
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            sentence_quota: default_sentence_quota(),
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            temperature: default_temperature(),
        }
    }
}

impl GeneratorConfig {
    pub(crate) fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("MISTRAL_API_KEY").unwrap_or_default(),
            api_url: lookup("MISTRAL_API_URL").unwrap_or_else(default_api_url),
            model: lookup("MISTRAL_MODEL").unwrap_or_else(default_model),
            sentence_quota: parsed(lookup, "SENTENCE_QUOTA")
                .unwrap_or_else(default_sentence_quota),
            max_attempts: parsed(lookup, "GENERATION_MAX_ATTEMPTS")
                .unwrap_or_else(default_max_attempts),
            initial_delay_ms: parsed(lookup, "GENERATION_INITIAL_DELAY_MS")
                .unwrap_or_else(default_initial_delay_ms),
            temperature: parsed(lookup, "GENERATION_TEMPERATURE")
                .unwrap_or_else(default_temperature),
        }
    }

    pub fn remote_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}
