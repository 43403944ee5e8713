//! Runtime configuration for the rate source.
//!
//! Defaults target the BRL dashboard. Every field can be overridden from the
//! environment with [`ExchangeConfig::from_env`].

use crate::core::currency::{CurrencyCode, CurrencyError};
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_KEY: &str = "CAMBIO_API_KEY";
pub const ENV_BASE_CURRENCY: &str = "CAMBIO_BASE_CURRENCY";
pub const ENV_ENDPOINT: &str = "CAMBIO_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "CAMBIO_TIMEOUT_MS";
pub const ENV_CURRENCIES: &str = "CAMBIO_CURRENCIES";

const DEFAULT_ENDPOINT: &str = "https://api.fxratesapi.example/v1";
const DEFAULT_API_KEY: &str = "demo";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "JPY", "CAD"];

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Currency {
        var: &'static str,
        #[source]
        source: CurrencyError,
    },
    #[error("{var} must be a positive integer number of milliseconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Connection settings for the upstream rate endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: String,
    /// Home currency every quote is expressed against.
    pub base_currency: CurrencyCode,
    /// Base URL, without trailing slash.
    pub endpoint: String,
    /// Applied to every outbound request.
    pub timeout: Duration,
    /// Currencies shown on the dashboard overview.
    pub supported_currencies: Vec<CurrencyCode>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            base_currency: CurrencyCode::brl(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            supported_currencies: DEFAULT_CURRENCIES
                .iter()
                .filter_map(|code| CurrencyCode::parse(code).ok())
                .collect(),
        }
    }
}

impl ExchangeConfig {
    /// Build a configuration from defaults overlaid with `CAMBIO_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_API_KEY) {
            config.api_key = non_empty(ENV_API_KEY, key)?;
        }
        if let Some(base) = lookup(ENV_BASE_CURRENCY) {
            config.base_currency = parse_code(ENV_BASE_CURRENCY, &base)?;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = non_empty(ENV_ENDPOINT, endpoint)?
                .trim_end_matches('/')
                .to_string();
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            let millis = timeout
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTimeout {
                    var: ENV_TIMEOUT_MS,
                    value: timeout.clone(),
                })?;
            config.timeout = Duration::from_millis(millis);
        }
        if let Some(list) = lookup(ENV_CURRENCIES) {
            let codes = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_code(ENV_CURRENCIES, s))
                .collect::<Result<Vec<_>, _>>()?;
            if codes.is_empty() {
                return Err(ConfigError::Empty {
                    var: ENV_CURRENCIES,
                });
            }
            config.supported_currencies = codes;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_currency(mut self, base: CurrencyCode) -> Self {
        self.base_currency = base;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_supported_currencies(mut self, currencies: Vec<CurrencyCode>) -> Self {
        self.supported_currencies = currencies;
        self
    }
}

fn parse_code(var: &'static str, value: &str) -> Result<CurrencyCode, ConfigError> {
    CurrencyCode::parse(value).map_err(|source| ConfigError::Currency { var, source })
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty { var })
    } else {
        Ok(value.trim().to_string())
    }
}
