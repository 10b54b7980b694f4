//! Document collections: the persistence seam for vendors, firms and products.
//!
//! Records are stored whole (as JSON documents) and addressed by their entity
//! id. Secondary lookups go through [`DocumentCollection::find_where`], which
//! matches a single top-level field by JSON equality.

pub mod in_memory;
pub mod postgres;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use storefront_catalog::{Firm, Product, Vendor};
use storefront_core::Entity;

pub use in_memory::InMemoryCollection;
pub use postgres::PostgresCollection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate id {id} in collection {collection}")]
    Duplicate { collection: &'static str, id: String },

    #[error("failed to encode/decode document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error in {operation}: {message}")]
    Database { operation: &'static str, message: String },
}

/// A record that can live in a [`DocumentCollection`].
pub trait Document: Entity + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name (also the discriminator in shared tables).
    const COLLECTION: &'static str;
}

impl Document for Vendor {
    const COLLECTION: &'static str = "vendors";
}

impl Document for Firm {
    const COLLECTION: &'static str = "firms";
}

impl Document for Product {
    const COLLECTION: &'static str = "products";
}

/// Async document collection.
///
/// Listing operations return documents in insertion order.
#[async_trait::async_trait]
pub trait DocumentCollection<D: Document>: Send + Sync {
    async fn find_by_id(&self, id: &D::Id) -> Result<Option<D>, StoreError>;

    /// Insert a new document. Fails with [`StoreError::Duplicate`] if the id exists.
    async fn insert(&self, doc: D) -> Result<D, StoreError>;

    /// Remove a document and return it, in one step.
    async fn find_by_id_and_delete(&self, id: &D::Id) -> Result<Option<D>, StoreError>;

    /// Append `reference` to the array field `field` of document `id`.
    ///
    /// The read and the write happen as one step, so concurrent appends to the
    /// same document are all kept. A missing or `null` field starts empty.
    /// Returns `false` if the document does not exist.
    async fn push_reference(&self, id: &D::Id, field: &str, reference: &str) -> Result<bool, StoreError>;

    /// Remove every occurrence of `reference` from the array field `field`, in
    /// one step. Returns `false` if the document does not exist.
    async fn pull_reference(&self, id: &D::Id, field: &str, reference: &str) -> Result<bool, StoreError>;

    /// All documents whose top-level `field` equals `value`.
    async fn find_where(
        &self,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<D>, StoreError>;

    async fn list(&self) -> Result<Vec<D>, StoreError>;
}
