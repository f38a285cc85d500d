use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;
use std::time::Duration;
use log::info;
use crate::error::{Error, Result};

pub const COINGECKO_API_KEY_ENV: &str = "COINGECKO_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub binance_base_url: String,
    pub okx_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            coingecko_api_key: None,
            binance_base_url: "https://api.binance.com".to_string(),
            okx_base_url: "https://www.okx.com".to_string(),
        }
    }
}

/// Settings of the single pooled HTTP client shared by every adapter.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub keep_alive_secs: u64,
    pub max_idle_connections: usize,
    pub idle_timeout_secs: u64,
    /// Cap on how much of a non-2xx body is kept for diagnostics.
    pub error_body_limit: usize,
    pub max_body_bytes: usize,
    pub user_agent: String,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
            connect_timeout_secs: 10,
            keep_alive_secs: 30,
            max_idle_connections: 100,
            idle_timeout_secs: 90,
            error_body_limit: 2 << 10,
            max_body_bytes: 1 << 20,
            user_agent: "top20-usdt-analyzer/1.0".to_string(),
            use_system_proxy: true,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    /// How many market-cap leaders to request from the ranking provider.
    pub universe_size: u32,
    pub top_k: usize,
    pub concurrency: usize,
    pub cooldown_ms: u64,
    /// Asset queried on the range venue for the extra report line.
    pub enrichment_symbol: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            universe_size: 20,
            top_k: 10,
            concurrency: 3,
            cooldown_ms: 1000,
            enrichment_symbol: Some("LAT".to_string()),
        }
    }
}

impl FetchConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults, then applies
    /// environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Config::load(path)?
            }
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(COINGECKO_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.coingecko_api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.universe_size == 0 {
            return Err(Error::ConfigError("fetch.universe_size must be positive".to_string()));
        }
        if self.fetch.top_k == 0 {
            return Err(Error::ConfigError("fetch.top_k must be positive".to_string()));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(Error::ConfigError("http.request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
