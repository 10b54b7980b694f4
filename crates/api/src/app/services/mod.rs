//! Service wiring: document collections, upload store, and the managers built on them.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use thiserror::Error;

use storefront_catalog::{Firm, Product, Vendor};
use storefront_core::DomainError;
use storefront_infra::{
    AppConfig, DocumentCollection, InMemoryCollection, PostgresCollection, StoreError, UploadError,
    UploadStore, store::postgres::ensure_schema,
};

pub mod firms;
pub mod products;
pub mod vendors;

pub use firms::FirmManager;
pub use products::{FirmProducts, ProductManager};
pub use vendors::{VendorDirectory, VendorProfile};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced record does not exist; the message is client-facing.
    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// The three document collections the managers work against.
#[derive(Clone)]
pub struct Collections {
    pub vendors: Arc<dyn DocumentCollection<Vendor>>,
    pub firms: Arc<dyn DocumentCollection<Firm>>,
    pub products: Arc<dyn DocumentCollection<Product>>,
}

impl Collections {
    /// In-memory collections (dev/test).
    pub fn in_memory() -> Self {
        Self::in_memory_with_vendors(Vec::new())
    }

    /// In-memory collections with pre-registered vendors.
    pub fn in_memory_with_vendors(vendors: Vec<Vendor>) -> Self {
        Self {
            vendors: Arc::new(InMemoryCollection::with_documents(vendors)),
            firms: Arc::new(InMemoryCollection::<Firm>::new()),
            products: Arc::new(InMemoryCollection::<Product>::new()),
        }
    }

    /// Postgres-backed collections sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            vendors: Arc::new(PostgresCollection::<Vendor>::new(pool.clone())),
            firms: Arc::new(PostgresCollection::<Firm>::new(pool.clone())),
            products: Arc::new(PostgresCollection::<Product>::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub firms: FirmManager,
    pub products: ProductManager,
    pub vendors: VendorDirectory,
    pub uploads: Arc<UploadStore>,
}

impl AppServices {
    pub fn new(collections: Collections, uploads: UploadStore, detach_on_delete: bool) -> Self {
        let uploads = Arc::new(uploads);
        Self {
            firms: FirmManager::new(&collections, uploads.clone(), detach_on_delete),
            products: ProductManager::new(&collections, uploads.clone(), detach_on_delete),
            vendors: VendorDirectory::new(&collections),
            uploads,
        }
    }
}

/// Build services from configuration: Postgres when `DATABASE_URL` is set,
/// in-memory collections otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let collections = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            ensure_schema(&pool)
                .await
                .context("failed to prepare documents table")?;
            tracing::info!("using Postgres document store");
            Collections::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory collections");
            Collections::in_memory()
        }
    };

    Ok(AppServices::new(
        collections,
        UploadStore::new(config.uploads.clone()),
        config.detach_on_delete,
    ))
}
