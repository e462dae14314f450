use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer, typically the local frontend.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub coingecko_api_key: Option<String>,
    #[serde(default)]
    pub alpha_vantage_key: String,
    #[serde(default)]
    pub news_api_key: String,
    #[serde(default)]
    pub aimlapi_key: String,
    #[serde(default)]
    pub serper_api_key: String,
    #[serde(default)]
    pub fred_api_key: String,
}

/// Per-domain cache TTLs in seconds.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    pub crypto_ttl: u64,
    pub chart_ttl: u64,
    pub stock_ttl: u64,
    pub forex_ttl: u64,
    pub bitcoin_ttl: u64,
    pub search_ttl: u64,
    pub completion_ttl: u64,
    pub news_ttl: u64,
    pub economic_ttl: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            crypto_ttl: 300,
            chart_ttl: 60,
            stock_ttl: 120,
            forex_ttl: 300,
            bitcoin_ttl: 60,
            search_ttl: 600,
            completion_ttl: 600,
            news_ttl: 600,
            economic_ttl: 3600,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&config_str)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Build a configuration from environment variables alone, used when no
    /// config file is present. API keys come from the environment (loaded
    /// from `.env` at startup), everything else takes defaults.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("COINGECKO_KEY") {
            self.api.coingecko_api_key = Some(key);
        }
        self.api.alpha_vantage_key =
            env_or("ALPHA_VANTAGE_KEY", &self.api.alpha_vantage_key);
        self.api.news_api_key = env_or("NEWS_API_KEY", &self.api.news_api_key);
        self.api.aimlapi_key = env_or("AIMLAPI_KEY", &self.api.aimlapi_key);
        self.api.serper_api_key = env_or("SERPER_API", &self.api.serper_api_key);
        self.api.fred_api_key = env_or("FRED_API_KEY", &self.api.fred_api_key);
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }
}
