use core_config::{env_or_default, ConfigError};

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Collection holding the book summaries
    pub collection: String,
}

impl QdrantConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            api_key: None,
            timeout_secs: 30,
            collection: "book_summaries".to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_collection(mut self, collection: String) -> Self {
        self.collection = collection;
        self
    }

    /// Load from environment variables:
    /// - `QDRANT_URL` (default: http://localhost:6334)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_TIMEOUT_SECS` (default: 30)
    /// - `QDRANT_COLLECTION_NAME` (default: book_summaries)
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("QDRANT_URL", "http://localhost:6334");
        let api_key = std::env::var("QDRANT_API_KEY").ok();
        let timeout_secs = env_or_default("QDRANT_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "QDRANT_TIMEOUT_SECS".to_string(),
                details: format!("{}", e),
            })?;
        let collection = env_or_default("QDRANT_COLLECTION_NAME", "book_summaries");

        Ok(Self {
            url,
            api_key,
            timeout_secs,
            collection,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self::new("http://localhost:6334".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_applies_defaults() {
        temp_env::with_vars(
            [
                ("QDRANT_URL", None::<&str>),
                ("QDRANT_COLLECTION_NAME", None),
                ("QDRANT_TIMEOUT_SECS", None),
            ],
            || {
                let config = QdrantConfig::from_env().unwrap();
                assert_eq!(config.url, "http://localhost:6334");
                assert_eq!(config.collection, "book_summaries");
                assert_eq!(config.timeout_secs, 30);
                assert!(config.api_key.is_none());
            },
        );
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        temp_env::with_var("QDRANT_TIMEOUT_SECS", Some("soon"), || {
            let err = QdrantConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("QDRANT_TIMEOUT_SECS"));
        });
    }
}
