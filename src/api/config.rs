//! Server configuration management.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! `from_lookup` takes any key lookup so parsing can be tested without touching
//! the process environment.

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

use thiserror::Error;
use tracing::warn;

use crate::services::JwtService;

const DEV_JWT_SECRET: &str = "dev-secret-do-not-use-in-production-change-me-now";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("JWT_SECRET environment variable is required in production")]
    MissingJwtSecret,
    #[error("JWT_SECRET must be at least 32 characters in production")]
    WeakJwtSecret,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0)
    pub host: IpAddr,
    /// Bind port (default: 8081)
    pub port: u16,
    /// True when APP_ENV=development
    pub development: bool,
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    /// Expected `aud` claim, if any
    pub auth_audience: Option<String>,
    /// Expected `iss` claim, if any
    pub auth_issuer: Option<String>,
    /// Allowed CORS origins; empty means permissive
    pub cors_origins: Vec<String>,
    /// PostgreSQL connection string; in-memory store when unset
    pub database_url: Option<String>,
    /// Global request quota; disabled when unset
    pub rate_limit_per_minute: Option<NonZeroU32>,
    /// Seed the in-memory store with the sample menu
    pub seed_items: bool,
    pub log_format: LogFormat,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("development", &self.development)
            .field("jwt_secret", &"<redacted>")
            .field("auth_audience", &self.auth_audience)
            .field("auth_issuer", &self.auth_issuer)
            .field("cors_origins", &self.cors_origins)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("seed_items", &self.seed_items)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8081,
            development: false,
            jwt_secret: String::new(),
            auth_audience: None,
            auth_issuer: None,
            cors_origins: Vec::new(),
            database_url: None,
            rate_limit_per_minute: None,
            seed_items: false,
            log_format: LogFormat::Text,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

fn non_empty(val: String) -> Option<String> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST`, `PORT`: bind address (default: 0.0.0.0:8081)
    /// - `APP_ENV`: `development` allows a default/short `JWT_SECRET`
    /// - `JWT_SECRET`: HS256 signing secret
    /// - `AUTH_AUDIENCE`, `AUTH_ISSUER`: expected token claims
    /// - `CORS_ORIGINS`: comma-separated allowed origins
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `RATE_LIMIT_PER_MINUTE`: global request quota
    /// - `SEED_ITEMS`: seed the in-memory store (default: false)
    /// - `LOG_FORMAT`: `text` or `json`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("HOST") {
            config.host = val.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HOST",
                value: val.clone(),
            })?;
        }

        if let Some(val) = lookup("PORT") {
            config.port = val.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: val.clone(),
            })?;
        }

        config.development = lookup("APP_ENV")
            .map(|val| val.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        config.jwt_secret = match lookup("JWT_SECRET").and_then(non_empty) {
            Some(secret) => secret,
            None if config.development => {
                warn!(
                    "JWT_SECRET not set! Using default secret for development. DO NOT USE IN PRODUCTION!"
                );
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::MissingJwtSecret),
        };

        if config.jwt_secret.len() < MIN_SECRET_LEN {
            if config.development {
                warn!("JWT_SECRET is less than 32 characters. Consider using a longer secret.");
            } else {
                return Err(ConfigError::WeakJwtSecret);
            }
        }

        config.auth_audience = lookup("AUTH_AUDIENCE").and_then(non_empty);
        config.auth_issuer = lookup("AUTH_ISSUER").and_then(non_empty);

        if let Some(val) = lookup("CORS_ORIGINS") {
            config.cors_origins = val
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        config.database_url = lookup("DATABASE_URL").and_then(non_empty);

        if let Some(val) = lookup("RATE_LIMIT_PER_MINUTE") {
            let quota: u32 = val.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RATE_LIMIT_PER_MINUTE",
                value: val.clone(),
            })?;
            // zero disables the limiter
            config.rate_limit_per_minute = NonZeroU32::new(quota);
        }

        if let Some(val) = lookup("SEED_ITEMS") {
            config.seed_items = parse_flag(&val);
        }

        if let Some(val) = lookup("LOG_FORMAT") {
            config.log_format = match val.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" | "" => LogFormat::Text,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "LOG_FORMAT",
                        value: val,
                    });
                }
            };
        }

        Ok(config)
    }

    /// Get the HTTP socket address.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build the token validator described by this configuration.
    pub fn jwt_service(&self) -> JwtService {
        let mut service = JwtService::new(&self.jwt_secret);
        if let Some(audience) = &self.auth_audience {
            service = service.with_audience(audience);
        }
        if let Some(issuer) = &self.auth_issuer {
            service = service.with_issuer(issuer);
        }
        service
    }
}
