//! Service configuration.
//!
//! Everything here is resolved once at process startup and then passed into the services and
//! the router. Request handlers never read environment variables.

use std::net::SocketAddr;
use std::time::Duration;

pub const REST_ADDR_VAR: &str = "MCG_REST_ADDR";
pub const TOKEN_SECRET_VAR: &str = "MCG_TOKEN_SECRET";
pub const TOKEN_ISSUER_VAR: &str = "MCG_TOKEN_ISSUER";
pub const TOKEN_TTL_VAR: &str = "MCG_TOKEN_TTL_SECS";
pub const MAX_UPLOAD_BYTES_VAR: &str = "MCG_MAX_UPLOAD_BYTES";

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_ISSUER: &str = "localhost";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 600;
/// Request body cap for attachment uploads. Scans routinely exceed axum's 2 MiB default.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Token signing settings.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    issuer: String,
    ttl: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenConfig {
    pub fn new(secret: String, issuer: String, ttl: Duration) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::Missing(TOKEN_SECRET_VAR));
        }
        if issuer.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: TOKEN_ISSUER_VAR,
                reason: "cannot be empty".into(),
            });
        }
        if ttl.is_zero() {
            return Err(ConfigError::Invalid {
                var: TOKEN_TTL_VAR,
                reason: "must be greater than zero".into(),
            });
        }
        Ok(Self {
            secret,
            issuer,
            ttl,
        })
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Configuration for the REST server process.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    rest_addr: SocketAddr,
    token: TokenConfig,
    max_upload_bytes: usize,
}

impl ApiConfig {
    pub fn new(rest_addr: SocketAddr, token: TokenConfig) -> Self {
        Self {
            rest_addr,
            token,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Result<Self, ConfigError> {
        if max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                var: MAX_UPLOAD_BYTES_VAR,
                reason: "must be greater than zero".into(),
            });
        }
        self.max_upload_bytes = max_upload_bytes;
        Ok(self)
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from any variable source. Unset variables fall back to their
    /// defaults, except the token secret which has none.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let rest_addr = lookup(REST_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_REST_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: REST_ADDR_VAR,
                reason: e.to_string(),
            })?;

        let secret = lookup(TOKEN_SECRET_VAR).ok_or(ConfigError::Missing(TOKEN_SECRET_VAR))?;
        let issuer = lookup(TOKEN_ISSUER_VAR).unwrap_or_else(|| DEFAULT_TOKEN_ISSUER.into());
        let ttl_secs = match lookup(TOKEN_TTL_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: TOKEN_TTL_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let max_upload_bytes = match lookup(MAX_UPLOAD_BYTES_VAR) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
                var: MAX_UPLOAD_BYTES_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let token = TokenConfig::new(secret, issuer, Duration::from_secs(ttl_secs))?;
        Self::new(rest_addr, token).with_max_upload_bytes(max_upload_bytes)
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    pub fn token(&self) -> &TokenConfig {
        &self.token
    }

    /// Largest request body accepted by the attachment upload route.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
