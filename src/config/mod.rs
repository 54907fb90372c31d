//! Runtime configuration loaded from the environment.
//!
//! Required values have no defaults: a missing CMS URL, API token or image
//! URL stops startup instead of producing a client that fails on every call.

use std::time::Duration;

use thiserror::Error;

use crate::client::BaseUrl;

/// Environment variable names.
pub mod vars {
    pub const API_URL: &str = "CMS_API_URL";
    pub const API_TOKEN: &str = "CMS_API_TOKEN";
    pub const IMAGE_URL: &str = "CMS_IMAGE_URL";
    pub const REQUEST_TIMEOUT_MS: &str = "CMS_REQUEST_TIMEOUT_MS";
    pub const RATE_LIMIT_MAX_REQUESTS: &str = "CMS_RATE_LIMIT_MAX_REQUESTS";
    pub const RATE_LIMIT_WINDOW_MS: &str = "CMS_RATE_LIMIT_WINDOW_MS";
}

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Client-side request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window: Duration::from_millis(DEFAULT_RATE_LIMIT_WINDOW_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    pub image_url: String,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Creates a configuration with default timeout and rate limit.
    pub fn new(
        api_url: impl Into<String>,
        api_token: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            image_url: image_url.into(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Loads and validates the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads and validates the configuration from any name → value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let api_url = required(vars::API_URL)?;
        let api_token = required(vars::API_TOKEN)?;
        let image_url = required(vars::IMAGE_URL)?;

        let timeout_ms = optional_number(&lookup, vars::REQUEST_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?;
        let max_requests = optional_number(
            &lookup,
            vars::RATE_LIMIT_MAX_REQUESTS,
            u64::from(DEFAULT_RATE_LIMIT_MAX_REQUESTS),
        )?;
        let window_ms = optional_number(
            &lookup,
            vars::RATE_LIMIT_WINDOW_MS,
            DEFAULT_RATE_LIMIT_WINDOW_MS,
        )?;

        let max_requests = u32::try_from(max_requests).map_err(|_| ConfigError::Invalid {
            var: vars::RATE_LIMIT_MAX_REQUESTS,
            reason: "too large".to_owned(),
        })?;

        let config = Self {
            api_url,
            api_token,
            image_url,
            request_timeout: Duration::from_millis(timeout_ms),
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_millis(window_ms),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints. Called by [`Config::from_lookup`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        BaseUrl::parse(&self.api_url).map_err(|e| ConfigError::Invalid {
            var: vars::API_URL,
            reason: e.to_string(),
        })?;
        if !(self.image_url.starts_with("http://") || self.image_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: vars::IMAGE_URL,
                reason: "must be an absolute http(s) URL".to_owned(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: vars::REQUEST_TIMEOUT_MS,
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid {
                var: vars::RATE_LIMIT_MAX_REQUESTS,
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.rate_limit.window.is_zero() {
            return Err(ConfigError::Invalid {
                var: vars::RATE_LIMIT_WINDOW_MS,
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

fn optional_number<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
            var,
            reason: format!("{raw:?} is not a whole number ({e})"),
        }),
    }
}
