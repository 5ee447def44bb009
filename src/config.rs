// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into a [`ServerConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `TOKEN_KEY` | Symmetric token key, exactly 32 bytes | Required |
//! | `TOKEN_TTL_SECS` | Session token lifetime, at most one year | `43200` (12 h) |
//! | `REPOSITORY_TIMEOUT_MS` | Deadline of each repository call | `1000` |
//! | `PASSWORD_MEMORY_KIB` | Argon2 memory cost | `19456` |
//! | `PASSWORD_ITERATIONS` | Argon2 time cost | `2` |
//! | `PASSWORD_PARALLELISM` | Argon2 lanes | `1` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS with `TLS_KEY_PATH` | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::token::KEY_SIZE;
use crate::auth::HashCost;
use crate::storage::paths::DATA_ROOT;

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory.
///
/// The database file `keeper.redb` is created inside it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token key.
///
/// The raw value is used as key material; it must be exactly 32 bytes long.
/// Tokens issued under one key are rejected by a server running another.
pub const TOKEN_KEY_ENV: &str = "TOKEN_KEY";

/// Environment variable name for the session token lifetime, in seconds.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Environment variable name for the repository call deadline, in milliseconds.
pub const REPOSITORY_TIMEOUT_ENV: &str = "REPOSITORY_TIMEOUT_MS";

pub const PASSWORD_MEMORY_ENV: &str = "PASSWORD_MEMORY_KIB";
pub const PASSWORD_ITERATIONS_ENV: &str = "PASSWORD_ITERATIONS";
pub const PASSWORD_PARALLELISM_ENV: &str = "PASSWORD_PARALLELISM";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 12 * 60 * 60;
/// Longest accepted session lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;
pub const DEFAULT_REPOSITORY_TIMEOUT_MS: u64 = 1000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("TOKEN_KEY must be exactly {expected} bytes, got {actual}")]
    TokenKeySize { expected: usize, actual: usize },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format {other}")),
        }
    }
}

/// Certificate and key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub token_key: Vec<u8>,
    pub session_ttl: chrono::Duration,
    pub repository_timeout: Duration,
    pub hash_cost: HashCost,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("token_key", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .field("repository_timeout", &self.repository_timeout)
            .field("hash_cost", &self.hash_cost)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the value of an
    /// environment variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token_key = get(TOKEN_KEY_ENV)
            .ok_or(ConfigError::Missing(TOKEN_KEY_ENV))?
            .into_bytes();
        if token_key.len() != KEY_SIZE {
            return Err(ConfigError::TokenKeySize {
                expected: KEY_SIZE,
                actual: token_key.len(),
            });
        }

        let ttl_secs: i64 = parse_or(get(TOKEN_TTL_ENV), TOKEN_TTL_ENV, DEFAULT_TOKEN_TTL_SECS)?;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
            return Err(ConfigError::Invalid {
                name: TOKEN_TTL_ENV,
                value: ttl_secs.to_string(),
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_SECS}"),
            });
        }

        let timeout_ms: u64 = parse_or(
            get(REPOSITORY_TIMEOUT_ENV),
            REPOSITORY_TIMEOUT_ENV,
            DEFAULT_REPOSITORY_TIMEOUT_MS,
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: REPOSITORY_TIMEOUT_ENV,
                value: timeout_ms.to_string(),
                reason: "must be positive".into(),
            });
        }

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(get(PASSWORD_MEMORY_ENV), PASSWORD_MEMORY_ENV, defaults.memory_kib)?,
            iterations: parse_or(
                get(PASSWORD_ITERATIONS_ENV),
                PASSWORD_ITERATIONS_ENV,
                defaults.iterations,
            )?,
            parallelism: parse_or(
                get(PASSWORD_PARALLELISM_ENV),
                PASSWORD_PARALLELISM_ENV,
                defaults.parallelism,
            )?,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?,
            data_dir: get(DATA_DIR_ENV).unwrap_or_else(|| DATA_ROOT.to_string()).into(),
            token_key,
            session_ttl: chrono::Duration::seconds(ttl_secs),
            repository_timeout: Duration::from_millis(timeout_ms),
            hash_cost,
            tls,
            log_format: parse_or(get(LOG_FORMAT_ENV), LOG_FORMAT_ENV, LogFormat::default())?,
        })
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: HOST_ENV,
            value: raw.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = load(&[(TOKEN_KEY_ENV, KEY)]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.token_key, KEY.as_bytes());
        assert_eq!(config.session_ttl, chrono::Duration::hours(12));
        assert_eq!(config.repository_timeout, Duration::from_secs(1));
        assert_eq!(config.hash_cost, HashCost::default());
        assert!(config.tls.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn token_key_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(TOKEN_KEY_ENV))));
        assert!(matches!(
            load(&[(TOKEN_KEY_ENV, "  ")]),
            Err(ConfigError::Missing(TOKEN_KEY_ENV))
        ));
    }

    #[test]
    fn token_key_must_be_32_bytes() {
        let err = load(&[(TOKEN_KEY_ENV, "short")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TokenKeySize {
                expected: 32,
                actual: 5
            }
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (TOKEN_KEY_ENV, KEY),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (DATA_DIR_ENV, "/var/lib/keeper"),
            (TOKEN_TTL_ENV, "60"),
            (REPOSITORY_TIMEOUT_ENV, "250"),
            (PASSWORD_MEMORY_ENV, "4096"),
            (PASSWORD_ITERATIONS_ENV, "3"),
            (PASSWORD_PARALLELISM_ENV, "2"),
            (TLS_CERT_PATH_ENV, "/etc/keeper/cert.pem"),
            (TLS_KEY_PATH_ENV, "/etc/keeper/key.pem"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/keeper"));
        assert_eq!(config.session_ttl, chrono::Duration::seconds(60));
        assert_eq!(config.repository_timeout, Duration::from_millis(250));
        assert_eq!(
            config.hash_cost,
            HashCost {
                memory_kib: 4096,
                iterations: 3,
                parallelism: 2
            }
        );
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: "/etc/keeper/cert.pem".into(),
                key: "/etc/keeper/key.pem".into(),
            })
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = load(&[(TOKEN_KEY_ENV, KEY), (PORT_ENV, "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: PORT_ENV, .. }));

        let err = load(&[(TOKEN_KEY_ENV, KEY), (TOKEN_TTL_ENV, "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: TOKEN_TTL_ENV, .. }));

        let err = load(&[(TOKEN_KEY_ENV, KEY), (REPOSITORY_TIMEOUT_ENV, "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: REPOSITORY_TIMEOUT_ENV,
                ..
            }
        ));
    }

    #[test]
    fn token_ttl_is_capped() {
        let config = load(&[(TOKEN_KEY_ENV, KEY), (TOKEN_TTL_ENV, "31536000")]).unwrap();
        assert_eq!(config.session_ttl, chrono::Duration::days(365));

        for huge in ["31536001", "100000000000000", "9223372036854775807"] {
            let err = load(&[(TOKEN_KEY_ENV, KEY), (TOKEN_TTL_ENV, huge)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: TOKEN_TTL_ENV, .. }));
        }
    }

    #[test]
    fn tls_needs_both_paths() {
        let err = load(&[(TOKEN_KEY_ENV, KEY), (TLS_CERT_PATH_ENV, "/cert.pem")]).unwrap_err();
        assert!(matches!(err, ConfigError::PartialTls));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = load(&[(TOKEN_KEY_ENV, KEY), (LOG_FORMAT_ENV, "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: LOG_FORMAT_ENV, .. }));
    }

    #[test]
    fn debug_output_hides_token_key() {
        let config = load(&[(TOKEN_KEY_ENV, KEY)]).unwrap();
        assert!(!format!("{config:?}").contains(KEY));
    }
}
