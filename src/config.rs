// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;
use url::Url;

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime of login tokens accepted by the API, in seconds.
    pub jwt_expiration: u64,
    /// Lifetime of the per-session token handed to the assessment client, in seconds.
    pub session_token_ttl: u64,
    pub rust_log: String,
    pub bind_address: SocketAddr,
    /// Externally reachable base URL, used to build the submit endpoint for clients.
    pub public_url: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let jwt_expiration = parse_seconds("JWT_EXPIRATION", 3600)?;
        let session_token_ttl = parse_seconds("SESSION_TOKEN_TTL", 7200)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS", e.to_string()))?;

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let public_url = Url::parse(&public_url)
            .map_err(|e| ConfigError::InvalidValue("PUBLIC_URL", e.to_string()))?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            session_token_ttl,
            rust_log,
            bind_address,
            public_url,
        })
    }
}

fn parse_seconds(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue(var, e.to_string())),
        Err(_) => Ok(default),
    }
}
