use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Process configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Path to the YAML schema describing the foreign-key chains
    #[validate(length(min = 1, message = "Schema path cannot be empty"))]
    pub schema_path: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            schema_path: "schema.yaml".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            schema_path: env::var("REINDEXER_SCHEMA").unwrap_or_else(|_| "schema.yaml".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(schema_path: String) -> Result<Self, ConfigError> {
        let config = Self { schema_path };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ResolverConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_schema_path_fails_validation() {
        assert!(ResolverConfig::from_cli(String::new()).is_err());
    }

    #[test]
    fn cli_config_keeps_the_given_path() {
        let config = ResolverConfig::from_cli("chains/work.yaml".to_string()).unwrap();
        assert_eq!(config.schema_path, "chains/work.yaml");
    }
}
