use std::sync::Arc;

use serde::Serialize;

use storefront_catalog::{Firm, NewProduct, Product};
use storefront_core::{FirmId, ProductId};
use storefront_infra::{DocumentCollection, UploadStore, UploadedFile};

use super::{Collections, ServiceError};

/// A firm's display name with its current products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmProducts {
    pub firm_name: String,
    pub products: Vec<Product>,
}

/// Creates, lists and deletes products belonging to firms.
#[derive(Clone)]
pub struct ProductManager {
    firms: Arc<dyn DocumentCollection<Firm>>,
    products: Arc<dyn DocumentCollection<Product>>,
    uploads: Arc<UploadStore>,
    detach_on_delete: bool,
}

impl ProductManager {
    pub fn new(collections: &Collections, uploads: Arc<UploadStore>, detach_on_delete: bool) -> Self {
        Self {
            firms: collections.firms.clone(),
            products: collections.products.clone(),
            uploads,
            detach_on_delete,
        }
    }

    /// Create a product under `firm_id` and append it to the firm's product list.
    #[tracing::instrument(skip_all, fields(firm_id = %firm_id))]
    pub async fn create_product(
        &self,
        firm_id: FirmId,
        details: NewProduct,
        image: Option<UploadedFile>,
    ) -> Result<Product, ServiceError> {
        if self.firms.find_by_id(&firm_id).await?.is_none() {
            return Err(ServiceError::NotFound("No firm found"));
        }

        let product = Product::create(ProductId::new(), firm_id, details)?;

        let stored = match image {
            Some(file) => Some(self.uploads.save(&file).await?),
            None => None,
        };

        let product = self.products.insert(product.with_image(stored)).await?;

        let linked = self
            .firms
            .push_reference(&firm_id, Firm::PRODUCTS_FIELD, &product.id_typed().to_string())
            .await?;
        if !linked {
            tracing::warn!(product_id = %product.id_typed(), "firm vanished before product could be linked");
        }

        tracing::info!(product_id = %product.id_typed(), "product created");
        Ok(product)
    }

    /// Products whose `firm` reference is `firm_id`.
    ///
    /// Reads the product collection, not the firm's embedded id list.
    #[tracing::instrument(skip_all, fields(firm_id = %firm_id))]
    pub async fn products_by_firm(&self, firm_id: FirmId) -> Result<FirmProducts, ServiceError> {
        let firm = self
            .firms
            .find_by_id(&firm_id)
            .await?
            .ok_or(ServiceError::NotFound("No firm found"))?;

        let products = self
            .products
            .find_where("firm", &serde_json::Value::String(firm_id.to_string()))
            .await?;

        Ok(FirmProducts {
            firm_name: firm.firm_name().to_string(),
            products,
        })
    }

    /// Delete a product by id and return the removed record.
    #[tracing::instrument(skip_all, fields(product_id = %product_id))]
    pub async fn delete_product_by_id(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        let product = self
            .products
            .find_by_id_and_delete(&product_id)
            .await?
            .ok_or(ServiceError::NotFound("No product found"))?;

        if self.detach_on_delete {
            self.firms
                .pull_reference(&product.firm(), Firm::PRODUCTS_FIELD, &product_id.to_string())
                .await?;
        }

        tracing::info!("product deleted");
        Ok(product)
    }
}
