use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub access: DataAccess,
}

fn default_max_connections() -> u32 {
    5
}

/// Which repository implementation backs the service.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataAccess {
    /// Hand-written parameterized SQL through sqlx
    Sql,
    /// Diesel query builder and row mapping
    #[default]
    Orm,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Cross-origin settings. Every field is a comma-separated list; `*`
/// means "any".
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: String,
    #[serde(default)]
    pub allowed_methods: String,
    #[serde(default)]
    pub allowed_headers: String,
    #[serde(default)]
    pub exposed_headers: String,
}

impl CorsConfig {
    pub fn allowed_origins(&self) -> Vec<String> {
        split_list(&self.allowed_origins)
    }

    pub fn allowed_methods(&self) -> Vec<String> {
        split_list(&self.allowed_methods)
    }

    pub fn allowed_headers(&self) -> Vec<String> {
        split_list(&self.allowed_headers)
    }

    pub fn exposed_headers(&self) -> Vec<String> {
        split_list(&self.exposed_headers)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, CORS__ALLOWED_ORIGINS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__ACCESS=sql overrides database.access
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
