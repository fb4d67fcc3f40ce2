use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub quote_api_url: String,
    pub quote_timeout_ms: u64,
    pub slippage_bps: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let quote_api_url = env_map
            .get("QUOTE_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://quote-api.jup.ag/v6".to_string());

        let quote_timeout_ms = env_map
            .get("QUOTE_TIMEOUT_MS")
            .map(|s| s.as_str())
            .unwrap_or("10000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "QUOTE_TIMEOUT_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;
        if quote_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "QUOTE_TIMEOUT_MS".to_string(),
                "must be nonzero".to_string(),
            ));
        }

        let slippage_bps = env_map
            .get("SLIPPAGE_BPS")
            .map(|s| s.as_str())
            .unwrap_or("50")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SLIPPAGE_BPS".to_string(),
                    "must be a valid u16".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            quote_api_url,
            quote_timeout_ms,
            slippage_bps,
        })
    }
}
