use core_config::{env_or_default, env_required, ConfigError};

/// OpenAI API client configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    /// Completion model for the Responses API
    pub model: String,
    /// Embedding model for the Embeddings API
    pub embedding_model: String,
    /// Vector width produced by `embedding_model`; also the width of the
    /// zero vectors returned on degraded embedding calls
    pub embedding_dimension: usize,
    /// Per-request timeout applied to the underlying HTTP client
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-nano".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimension: 1536,
            timeout_secs: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Load from environment variables:
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_BASE_URL` (default: https://api.openai.com/v1)
    /// - `OPENAI_MODEL` (default: gpt-4.1-nano)
    /// - `OPENAI_EMBEDDING_MODEL` (default: text-embedding-3-small)
    /// - `OPENAI_EMBEDDING_DIMENSION` (default: 1536)
    /// - `OPENAI_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("OPENAI_API_KEY")?;
        let base_url = env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");
        let model = env_or_default("OPENAI_MODEL", "gpt-4.1-nano");
        let embedding_model = env_or_default("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small");

        let embedding_dimension = env_or_default("OPENAI_EMBEDDING_DIMENSION", "1536")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "OPENAI_EMBEDDING_DIMENSION".to_string(),
                details: format!("{}", e),
            })?;

        let timeout_secs = env_or_default("OPENAI_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "OPENAI_TIMEOUT_SECS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            api_key,
            base_url,
            model,
            embedding_model,
            embedding_dimension,
            timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_api_key() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            let err = OpenAIConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("OPENAI_API_KEY"));
        });
    }

    #[test]
    fn from_env_applies_defaults() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("OPENAI_BASE_URL", None),
                ("OPENAI_MODEL", None),
            ],
            || {
                let config = OpenAIConfig::from_env().unwrap();
                assert_eq!(config.base_url, "https://api.openai.com/v1");
                assert_eq!(config.model, "gpt-4.1-nano");
                assert_eq!(config.embedding_model, "text-embedding-3-small");
                assert_eq!(config.embedding_dimension, 1536);
                assert_eq!(config.timeout_secs, 30);
            },
        );
    }

    #[test]
    fn from_env_rejects_bad_dimension() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("OPENAI_EMBEDDING_DIMENSION", Some("not-a-number")),
            ],
            || {
                let err = OpenAIConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("OPENAI_EMBEDDING_DIMENSION"));
            },
        );
    }
}
