use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{DEFAULT_LIMIT, DEFAULT_MAX_INTERACTIONS};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    /// Absent means venues and users live in memory
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub personalization: PersonalizationSettings,
    #[serde(default)]
    pub recommendations: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Credentials for the personalization backend
///
/// Both values must be present and non-empty for the personalized engine
/// to be selected.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalizationSettings {
    pub database_id: Option<String>,
    pub private_token: Option<String>,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Recent interactions the engine keeps in memory; older ones are evicted
    #[serde(default = "default_max_interactions")]
    pub max_interactions: usize,
}

impl PersonalizationSettings {
    pub fn has_credentials(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.database_id) && present(&self.private_token)
    }
}

impl Default for PersonalizationSettings {
    fn default() -> Self {
        Self {
            database_id: None,
            private_token: None,
            query_timeout_ms: default_query_timeout_ms(),
            max_interactions: default_max_interactions(),
        }
    }
}

fn default_query_timeout_ms() -> u64 { 250 }
fn default_max_interactions() -> usize { DEFAULT_MAX_INTERACTIONS }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            default_radius_km: default_radius_km(),
        }
    }
}

fn default_count() -> usize { DEFAULT_LIMIT }
fn default_max_count() -> usize { 100 }
fn default_radius_km() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAFE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CAFE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CAFE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CAFE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the unprefixed variables deployments commonly set
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(database_id) = env::var("PERSONALIZATION_DATABASE_ID") {
        builder = builder.set_override("personalization.database_id", database_id)?;
    }
    if let Ok(private_token) = env::var("PERSONALIZATION_PRIVATE_TOKEN") {
        builder = builder.set_override("personalization.private_token", private_token)?;
    }

    builder.build()
}
