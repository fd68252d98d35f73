//! Configuration management for ragline using the prefer crate.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default backend endpoint (the reference server's development address).
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the RAG backend.
    pub endpoint: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Upload body chunk size in bytes; also the progress granularity.
    pub upload_chunk_size: usize,
    /// Default number of recent queries to fetch.
    pub recent_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: "ragline/0.3 (terminal client)".to_string(),
            request_timeout: 30,
            upload_chunk_size: 64 * 1024,
            recent_limit: 10,
        }
    }
}

impl Settings {
    /// Check that the endpoint is a usable http(s) URL.
    pub fn validate(&self) -> Result<(), String> {
        match Url::parse(&self.endpoint) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
            Ok(url) => Err(format!("unsupported endpoint scheme: {}", url.scheme())),
            Err(e) => Err(format!("invalid endpoint {:?}: {}", self.endpoint, e)),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the RAG backend.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Upload body chunk size in bytes.
    #[serde(default)]
    pub upload_chunk_size: Option<usize>,
    /// Default number of recent queries to fetch.
    #[serde(default)]
    pub recent_limit: Option<usize>,
}

impl Config {
    /// Load configuration using the prefer crate.
    /// Automatically discovers ragline config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("ragline").await {
            Ok(pref_config) => {
                let endpoint: Option<String> = pref_config.get("endpoint").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> =
                    pref_config.get("request_timeout").ok();
                let upload_chunk_size: Option<usize> =
                    pref_config.get("upload_chunk_size").ok();
                let recent_limit: Option<usize> = pref_config.get("recent_limit").ok();

                Config {
                    endpoint,
                    user_agent,
                    request_timeout,
                    upload_chunk_size,
                    recent_limit,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Build a fully-populated config snapshot from effective settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: Some(settings.endpoint.clone()),
            user_agent: Some(settings.user_agent.clone()),
            request_timeout: Some(settings.request_timeout),
            upload_chunk_size: Some(settings.upload_chunk_size),
            recent_limit: Some(settings.recent_limit),
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref endpoint) = self.endpoint {
            settings.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(chunk) = self.upload_chunk_size {
            settings.upload_chunk_size = chunk;
        }
        if let Some(limit) = self.recent_limit {
            settings.recent_limit = limit;
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_usable() {
        let settings = Settings::default();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.recent_limit, 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn apply_overrides_and_normalizes_trailing_slash() {
        let config = Config {
            endpoint: Some("https://rag.example.org/".to_string()),
            request_timeout: Some(5),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        assert_eq!(settings.endpoint, "https://rag.example.org");
        assert_eq!(settings.request_timeout, 5);
        // Untouched fields keep their defaults.
        assert_eq!(settings.recent_limit, 10);
    }

    #[test]
    fn validate_rejects_non_http_endpoints() {
        let mut settings = Settings::default();
        settings.endpoint = "ftp://example.org".to_string();
        assert!(settings.validate().is_err());

        settings.endpoint = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn config_snapshot_round_trips_through_toml() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&Config::from_settings(&settings)).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.endpoint.as_deref(), Some(DEFAULT_ENDPOINT));
        assert_eq!(parsed.recent_limit, Some(10));
    }
}
