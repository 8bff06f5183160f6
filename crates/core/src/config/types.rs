use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("trends.db")
}

/// Research provider configuration (the LLM used to summarize trends).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchConfig {
    /// Provider API key. When absent, `ANTHROPIC_API_KEY` is consulted at startup.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the provider API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_research_timeout")]
    pub timeout_secs: u64,
    /// Token budget for a single completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Platforms the prompt asks about, in prompt order.
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            timeout_secs: default_research_timeout(),
            max_tokens: default_max_tokens(),
            platforms: default_platforms(),
        }
    }
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_research_timeout() -> u64 {
    25
}

fn default_max_tokens() -> u32 {
    2000
}

/// Platforms covered when none are configured.
pub const DEFAULT_PLATFORMS: [&str; 5] = [
    "Spotify",
    "TikTok",
    "Instagram Reels",
    "YouTube",
    "Industry Discussion",
];

fn default_platforms() -> Vec<String> {
    DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect()
}

/// Collection job configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    /// Run collection periodically in the background.
    /// When disabled, collection only runs via `POST /api/v1/collect-trends`.
    #[serde(default)]
    pub schedule_enabled: bool,

    /// Seconds between scheduled runs.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Genres processed concurrently within one run (1 = sequential).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_genres: usize,

    /// Genre names inserted at startup if missing.
    #[serde(default)]
    pub seed_genres: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            schedule_enabled: false,
            interval_secs: default_interval(),
            max_concurrent_genres: default_max_concurrent(),
            seed_genres: Vec::new(),
        }
    }
}

fn default_interval() -> u64 {
    86_400 // daily
}

fn default_max_concurrent() -> usize {
    1
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub research: SanitizedResearchConfig,
    pub collection: CollectionConfig,
}

/// Research config with the API key hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedResearchConfig {
    pub api_key_configured: bool,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub platforms: Vec<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            research: SanitizedResearchConfig {
                api_key_configured: config
                    .research
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.is_empty()),
                model: config.research.model.clone(),
                api_base: config.research.api_base.clone(),
                timeout_secs: config.research.timeout_secs,
                max_tokens: config.research.max_tokens,
                platforms: config.research.platforms.clone(),
            },
            collection: config.collection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, PathBuf::from("trends.db"));
        assert_eq!(config.research.timeout_secs, 25);
        assert_eq!(config.research.platforms.len(), 5);
        assert!(!config.collection.schedule_enabled);
        assert_eq!(config.collection.max_concurrent_genres, 1);
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let mut config = Config::default();
        config.research.api_key = Some("sk-secret".to_string());

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.research.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_sanitized_config_empty_key_not_configured() {
        let mut config = Config::default();
        config.research.api_key = Some(String::new());

        let sanitized = SanitizedConfig::from(&config);
        assert!(!sanitized.research.api_key_configured);
    }
}
