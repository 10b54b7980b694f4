//! Image upload storage.
//!
//! An [`UploadStore`] is built once from an [`UploadConfig`] and handed to the
//! firm and product managers; it owns no other state.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// How stored files are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameStrategy {
    /// `<uuid-v7><ext>`: unique even for uploads in the same millisecond.
    #[default]
    Unique,
    /// `<capture-time-ms><ext>`: legacy naming; same-millisecond uploads collide.
    Timestamp,
}

impl FromStr for FilenameStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(Self::Unique),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(format!("expected `unique` or `timestamp`, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub strategy: FilenameStrategy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            strategy: FilenameStrategy::default(),
        }
    }
}

/// A file received from a client, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid stored file name {0:?}")]
    InvalidName(String),

    #[error("stored file {0:?} not found")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    config: UploadConfig,
}

impl UploadStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Name under which a file called `original_name` captured at `now` is stored.
    pub fn stored_name(&self, original_name: &str, now: DateTime<Utc>) -> String {
        let ext = extension_of(original_name);
        match self.config.strategy {
            FilenameStrategy::Unique => format!("{}{ext}", Uuid::now_v7()),
            FilenameStrategy::Timestamp => format!("{}{ext}", now.timestamp_millis()),
        }
    }

    /// Write `file` into the upload directory and return its stored name.
    pub async fn save(&self, file: &UploadedFile) -> Result<String, UploadError> {
        let name = self.stored_name(&file.original_name, Utc::now());
        let path = self.config.dir.join(&name);

        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|source| UploadError::Write {
                path: self.config.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|source| UploadError::Write { path, source })?;

        tracing::debug!(stored = %name, bytes = file.bytes.len(), "upload stored");
        Ok(name)
    }

    /// Read back a stored file by name.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, UploadError> {
        if !is_plain_file_name(name) {
            return Err(UploadError::InvalidName(name.to_string()));
        }
        let path = self.config.dir.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(UploadError::NotFound(name.to_string()))
            }
            Err(source) => Err(UploadError::Read { path, source }),
        }
    }
}

/// Extension of a client file name including the dot, or `""`.
///
/// Only the last path component is considered; a leading dot (dotfile) does not
/// start an extension, and `..` has none.
pub fn extension_of(original_name: &str) -> &str {
    let base = original_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);
    if base == ".." {
        return "";
    }
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[idx..],
        _ => "",
    }
}

/// Content type served for a stored file, guessed from its extension.
pub fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name).first_or_octet_stream().to_string()
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}
