// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the [`AppConfig`] loaded once at
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Base64-encoded HMAC secret (at least 32 bytes decoded) | Required |
//! | `JWT_EXPIRATION_MS` | Access token lifetime in milliseconds | `604800000` (7 days) |
//! | `HOST` | Server bind IP (`0.0.0.0`, `::`, `[::1]`) | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding `blog.redb` | `./data` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `SEED_ADMIN_USERNAME` | Administrator created at startup | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password of the seeded administrator | Required with username |
//! | `SEED_ADMIN_EMAIL` | E-mail of the seeded administrator | `<username>@localhost` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::service::SeedAdmin;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION_MS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const SEED_ADMIN_USERNAME_ENV: &str = "SEED_ADMIN_USERNAME";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";

pub const DEFAULT_JWT_EXPIRATION_MS: u64 = 604_800_000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Database file name inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "blog.redb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Startup configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Base64 text as configured; decoded by the token codec
    pub jwt_secret: String,
    pub jwt_expiration_ms: u64,
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    pub seed_admin: Option<SeedAdmin>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_ms", &self.jwt_expiration_ms)
            .field("bind_addr", &self.bind_addr)
            .field("data_dir", &self.data_dir)
            .field("log_format", &self.log_format)
            .field("seed_admin", &self.seed_admin)
            .finish()
    }
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = var(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let jwt_expiration_ms = match var(JWT_EXPIRATION_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => return Err(invalid(JWT_EXPIRATION_ENV, "must be greater than zero")),
                Ok(ms) => ms,
                Err(e) => return Err(invalid(JWT_EXPIRATION_ENV, e)),
            },
            None => DEFAULT_JWT_EXPIRATION_MS,
        };

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| invalid(PORT_ENV, e))?,
            None => DEFAULT_PORT,
        };
        // IP literal; IPv6 with or without brackets
        let ip: IpAddr = host
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|e| invalid(HOST_ENV, e))?;
        let bind_addr = SocketAddr::new(ip, port);

        let data_dir = PathBuf::from(var(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let log_format = match var(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let seed_admin = match var(SEED_ADMIN_USERNAME_ENV) {
            Some(username) => {
                let password = var(SEED_ADMIN_PASSWORD_ENV)
                    .ok_or(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV))?;
                let email = var(SEED_ADMIN_EMAIL_ENV)
                    .unwrap_or_else(|| format!("{username}@localhost"));
                Some(SeedAdmin {
                    username,
                    email,
                    password,
                })
            }
            None => None,
        };

        Ok(Self {
            jwt_secret,
            jwt_expiration_ms,
            bind_addr,
            data_dir,
            log_format,
            seed_admin,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn invalid(name: &'static str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.to_string(),
    }
}
