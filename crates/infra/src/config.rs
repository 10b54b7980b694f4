//! Process configuration, read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::uploads::{FilenameStrategy, UploadConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_JWT_SECRET: &str = "dev-secret";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Postgres URL; in-memory collections are used when unset.
    pub database_url: Option<String>,
    pub uploads: UploadConfig,
    pub body_limit_bytes: usize,
    /// Prune parent back-references when a firm or product is deleted.
    pub detach_on_delete: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("BIND_ADDR", e))?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let strategy = match get("UPLOAD_FILENAME_STRATEGY") {
            Some(raw) => raw
                .parse::<FilenameStrategy>()
                .map_err(|e| invalid("UPLOAD_FILENAME_STRATEGY", e))?,
            None => FilenameStrategy::default(),
        };

        let body_limit_bytes = match get("UPLOAD_BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid("UPLOAD_BODY_LIMIT_BYTES", e))?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        let detach_on_delete = match get("DETACH_ON_DELETE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                invalid("DETACH_ON_DELETE", format!("expected true/false, got {raw:?}"))
            })?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            database_url: get("DATABASE_URL"),
            uploads: UploadConfig {
                dir: get("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| UploadConfig::default().dir),
                strategy,
            },
            body_limit_bytes,
            detach_on_delete,
        })
    }
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
