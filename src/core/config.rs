use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigError;
use super::types::{EMBEDDING_DIMENSIONS, LEGACY_EMBEDDING_DIMENSIONS, SUSPICIOUS_SIZE_FACTOR};
use crate::vector::normalizer::NormalizerConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Target dimensionality for storage and comparison
    pub dimensions: usize,
    /// Corruption guard: inputs longer than `dimensions * suspicious_size_factor` are refused
    pub suspicious_size_factor: usize,
    /// Model size that is repaired by adjacent duplication when the target is exactly double
    pub legacy_dimensions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: EMBEDDING_DIMENSIONS,
            suspicious_size_factor: SUSPICIOUS_SIZE_FACTOR,
            legacy_dimensions: LEGACY_EMBEDDING_DIMENSIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EmbeddingConfig {
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            target_dimensions: self.dimensions,
            suspicious_size_factor: self.suspicious_size_factor,
            legacy_dimensions: self.legacy_dimensions,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded configuration from {}: dimensions={}, suspicious_size_factor={}",
            path.as_ref().display(),
            config.embedding.dimensions,
            config.embedding.suspicious_size_factor
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let embedding = &self.embedding;
        if embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", embedding.dimensions));
        }
        // below 2 the exact-double input would already trip the corruption guard
        if embedding.suspicious_size_factor < 2 {
            return Err(invalid(
                "embedding.suspicious_size_factor",
                embedding.suspicious_size_factor,
            ));
        }
        if embedding.legacy_dimensions == 0 {
            return Err(invalid("embedding.legacy_dimensions", embedding.legacy_dimensions));
        }
        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging.level", "\"\""));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}
