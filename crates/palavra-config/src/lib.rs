use std::env;

use serde::{Deserialize, Serialize};

use self::evaluator::EvaluatorConfig;
use self::generator::GeneratorConfig;
use self::storage::StorageConfig;

pub mod evaluator;
pub mod generator;
pub mod storage;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub evaluator: EvaluatorConfig,
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Build from the process environment
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults per field
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            evaluator: EvaluatorConfig::from_lookup(&lookup),
            generator: GeneratorConfig::from_lookup(&lookup),
            storage: StorageConfig::from_lookup(&lookup),
        }
    }
}

/// Parse `key` through `lookup`, ignoring missing or malformed values
pub(crate) fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
