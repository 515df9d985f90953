//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and turned into the
//! explicit settings the services are constructed with. Nothing below the
//! binary reads the environment.
//!
//! ## Store
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! # or
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without Redis configuration the service runs on an in-memory store.
//!
//! ## Optional Variables
//!
//! - `API_QUOTA` - Registrations per client per 30 minute window (default: 100)
//! - `DOMAIN` - Public prefix for short URLs, also denylisted (default: `localhost:3000`)
//! - `FORBIDDEN_DOMAINS` - Extra comma-separated hosts that cannot be shortened
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` (default: `false`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;

use crate::application::services::{DEFAULT_QUOTA, ShortenerSettings};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Registrations allowed per client per window.
    pub api_quota: i64,
    /// Public prefix used to build short URLs.
    pub domain: String,
    /// Additional hosts that cannot be shortened; `domain` is always included.
    pub forbidden_domains: Vec<String>,
    /// When true, the client identity is read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        let redis_url = Self::load_redis_url();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let api_quota = parse_quota(env::var("API_QUOTA").ok().as_deref());

        let domain = env::var("DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "localhost:3000".to_string());

        let forbidden_domains = env::var("FORBIDDEN_DOMAINS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            redis_url,
            listen_addr,
            log_level,
            log_format,
            api_quota,
            domain,
            forbidden_domains,
            behind_proxy,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `redis_url` does not use a `redis://` or `rediss://` scheme
    /// - `api_quota` is not positive
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.api_quota <= 0 {
            anyhow::bail!("API_QUOTA must be greater than 0");
        }

        Ok(())
    }

    /// Builds the settings injected into the shortener service.
    pub fn shortener_settings(&self) -> ShortenerSettings {
        let mut forbidden_domains = vec![self.domain.clone()];
        forbidden_domains.extend(self.forbidden_domains.iter().cloned());

        ShortenerSettings {
            quota: self.api_quota,
            public_domain: self.domain.clone(),
            forbidden_domains,
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Store: redis ({})", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Store: in-memory");
        }

        tracing::info!("  Domain: {}", self.domain);
        tracing::info!("  API quota: {} per 30 min", self.api_quota);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses `API_QUOTA`; missing, malformed or non-positive values give the default.
fn parse_quota(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|q| *q > 0)
        .unwrap_or(DEFAULT_QUOTA)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Masks sensitive information in connection strings for logging.
///
/// `redis://:password@host:port/db` → `redis://:***@host:port/db`
pub fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// Expects `.env` to be loaded already (e.g. via `dotenvy::dotenv()`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
