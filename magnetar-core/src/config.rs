//! Centralized configuration for Magnetar.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Magnetar components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MagnetarConfig {
    pub search: SearchConfig,
    pub network: NetworkConfig,
    pub server: ServerConfig,
}

/// Aggregation engine configuration.
///
/// Controls request defaults, which providers are switched on and the
/// extra anti-bot signatures recognised on top of the built-in set.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Result limit used when the caller does not send one
    pub default_limit: usize,
    /// Category used when the caller does not send one
    pub default_category: String,
    /// Lowercase provider ids to enable (None = registry defaults)
    pub enabled_providers: Option<Vec<String>>,
    /// Additional challenge page patterns (regular expressions)
    pub challenge_patterns: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            default_category: "all".to_string(),
            enabled_providers: None,
            challenge_patterns: Vec::new(),
        }
    }
}

/// Upstream HTTP configuration.
///
/// Controls request timeouts, the user agent presented to index sites
/// and per-provider base URLs (overridable for mirrors).
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Upper bound for a single provider request
    pub request_timeout: Duration,
    /// User agent for upstream requests
    pub user_agent: String,
    /// Base URL of the ThePirateBay JSON API
    pub tpb_base_url: String,
    /// Base URL of the YTS API
    pub yts_base_url: String,
    /// Base URL of the EZTV API
    pub eztv_base_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            tpb_base_url: "https://apibay.org".to_string(),
            yts_base_url: "https://yts.lt".to_string(),
            eztv_base_url: "https://eztvx.to".to_string(),
        }
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1337,
        }
    }
}

impl MagnetarConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Search configuration overrides
        if let Some(limit) = lookup("MAGNETAR_DEFAULT_LIMIT") {
            if let Ok(value) = limit.parse::<usize>() {
                if value > 0 {
                    config.search.default_limit = value;
                }
            }
        }

        if let Some(providers) = lookup("MAGNETAR_PROVIDERS") {
            let ids = split_list(&providers, ',')
                .into_iter()
                .map(|id| id.to_lowercase())
                .collect::<Vec<_>>();
            if !ids.is_empty() {
                config.search.enabled_providers = Some(ids);
            }
        }

        if let Some(patterns) = lookup("MAGNETAR_CHALLENGE_PATTERNS") {
            config.search.challenge_patterns = split_list(&patterns, ';');
        }

        // Network configuration overrides
        if let Some(timeout) = lookup("MAGNETAR_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.network.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(agent) = lookup("MAGNETAR_USER_AGENT") {
            config.network.user_agent = agent;
        }

        if let Some(url) = lookup("MAGNETAR_TPB_URL") {
            config.network.tpb_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(url) = lookup("MAGNETAR_YTS_URL") {
            config.network.yts_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(url) = lookup("MAGNETAR_EZTV_URL") {
            config.network.eztv_base_url = url.trim_end_matches('/').to_string();
        }

        // Server configuration overrides; PORT is honoured for hosting platforms
        if let Some(host) = lookup("MAGNETAR_HOST") {
            config.server.host = host;
        }

        for key in ["PORT", "MAGNETAR_PORT"] {
            if let Some(port) = lookup(key) {
                if let Ok(value) = port.parse::<u16>() {
                    config.server.port = value;
                }
            }
        }

        config
    }
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
