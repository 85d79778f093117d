use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::snippet::SnippetConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub page_size: u32,
    pub snippet: SnippetConfig,
    pub category_limit: u32,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: 10,
            snippet: SnippetConfig::default(),
            category_limit: 8,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Reads `.env` (if present) and the process environment once, at startup.
    /// The result is handed to whatever needs it; nothing reads the
    /// environment afterwards.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = Config {
            api_base_url: lookup("HACKS_API_BASE_URL").unwrap_or(defaults.api_base_url),
            page_size: parse_or(&lookup, "HACKS_PAGE_SIZE", defaults.page_size)?,
            snippet: SnippetConfig {
                length: parse_or(&lookup, "HACKS_SNIPPET_LENGTH", defaults.snippet.length)?,
                context_before: parse_or(
                    &lookup,
                    "HACKS_SNIPPET_CONTEXT",
                    defaults.snippet.context_before,
                )?,
            },
            category_limit: parse_or(&lookup, "HACKS_CATEGORY_LIMIT", defaults.category_limit)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HACKS_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that the rest of the crate assumes. Call again after
    /// applying command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::OutOfRange {
                key: "HACKS_PAGE_SIZE",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.snippet.context_before >= self.snippet.length {
            return Err(ConfigError::OutOfRange {
                key: "HACKS_SNIPPET_CONTEXT",
                reason: format!(
                    "must be smaller than the snippet length ({})",
                    self.snippet.length
                ),
            });
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
