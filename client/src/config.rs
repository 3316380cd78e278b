//! Configuration management for the greenhouse API client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with HGM_ prefix (e.g. HGM__API__BASE_URL)

use config::{ConfigError, Environment, File, Source};
use serde::Deserialize;
use shared::Language;

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Greenhouse API configuration
    pub api: ApiConfig,

    /// Credentials used to obtain a session
    #[serde(default)]
    pub auth: AuthConfig,

    /// Output configuration
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST API, e.g. https://invernadero.example.com/api
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    pub email: Option<String>,
    pub password: Option<String>,

    /// Pre-issued bearer token; skips the login request when set
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Language code for labels and error messages (es, en)
    pub language: String,
}

impl DisplayConfig {
    pub fn language(&self) -> Language {
        Language::from_code(&self.language)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("HGM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::from_source(
            &environment,
            File::with_name(&format!("config/{}", environment)).required(false),
        )
    }

    /// Build a configuration from the defaults, one file-like source and
    /// environment variable overrides
    pub fn from_source<S>(environment: &str, source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("api.base_url", "http://localhost:8080/api")?
            .set_default("api.timeout_secs", 15)?
            .set_default("api.user_agent", concat!("hgm-client/", env!("CARGO_PKG_VERSION")))?
            .set_default("display.language", "es")?
            // Load environment-specific config file
            .add_source(source)
            // Override with environment variables (HGM prefix)
            .add_source(
                Environment::with_prefix("HGM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let config = Config::from_source("test", File::from_str("", FileFormat::Toml)).unwrap();

        assert_eq!(config.environment, "test");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.display.language(), Language::Spanish);
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [api]
            base_url = "https://invernadero.example.com/api"
            timeout_secs = 5

            [auth]
            email = "admin@invernadero.com"

            [display]
            language = "en"
        "#;
        let config = Config::from_source("test", File::from_str(toml, FileFormat::Toml)).unwrap();

        assert_eq!(config.api.base_url, "https://invernadero.example.com/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.auth.email.as_deref(), Some("admin@invernadero.com"));
        assert_eq!(config.display.language(), Language::English);
    }
}
