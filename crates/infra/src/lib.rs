//! Infrastructure layer: document storage, image uploads, configuration.

pub mod config;
pub mod store;
pub mod uploads;

pub use config::{AppConfig, ConfigError};
pub use store::{Document, DocumentCollection, InMemoryCollection, PostgresCollection, StoreError};
pub use uploads::{FilenameStrategy, UploadConfig, UploadError, UploadStore, UploadedFile};
