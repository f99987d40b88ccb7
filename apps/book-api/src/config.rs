use std::path::PathBuf;

use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;
use domain_books::QdrantConfig;
use openai_client::OpenAIConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the library crates
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub database: PostgresConfig,
    pub openai: OpenAIConfig,
    pub qdrant: QdrantConfig,
    /// Summaries source file for the one-time ingestion
    pub summaries_path: PathBuf,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Defaults: HOST=0.0.0.0, PORT=8080
        let database = PostgresConfig::from_env()?; // Required - fails if DATABASE_URL unset
        let openai = OpenAIConfig::from_env()?; // Required - fails if OPENAI_API_KEY unset
        let qdrant = QdrantConfig::from_env()?;
        let summaries_path =
            PathBuf::from(env_or_default("SUMMARIES_PATH", "apps/book-api/data/book_summaries.txt"));

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            database,
            openai,
            qdrant,
            summaries_path,
        })
    }
}
