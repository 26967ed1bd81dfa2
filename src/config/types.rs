// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
    pub validator: ValidatorConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen address, `HOST:PORT` or `:PORT` for all interfaces
    pub listen: String,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub verbose: bool,
    /// Force colour on or off; auto-detected from stderr when unset
    #[serde(default)]
    pub color: Option<bool>,
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub file: Option<String>,
}

/// Swagger UI bundle configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Overrides the platform cache directory
    #[serde(default)]
    pub cache_dir: Option<String>,
    /// Release API answering with a `zipball_url`
    pub release_api: String,
    pub force_update: bool,
}

/// Remote validator configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ValidatorConfig {
    pub url: String,
}
