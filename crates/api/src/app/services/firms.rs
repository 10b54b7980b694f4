use std::sync::Arc;

use storefront_catalog::{Firm, NewFirm, Vendor};
use storefront_core::{FirmId, VendorId};
use storefront_infra::{DocumentCollection, UploadStore, UploadedFile};

use super::{Collections, ServiceError};

/// Creates and deletes firms on behalf of vendors.
#[derive(Clone)]
pub struct FirmManager {
    vendors: Arc<dyn DocumentCollection<Vendor>>,
    firms: Arc<dyn DocumentCollection<Firm>>,
    uploads: Arc<UploadStore>,
    detach_on_delete: bool,
}

impl FirmManager {
    pub fn new(collections: &Collections, uploads: Arc<UploadStore>, detach_on_delete: bool) -> Self {
        Self {
            vendors: collections.vendors.clone(),
            firms: collections.firms.clone(),
            uploads,
            detach_on_delete,
        }
    }

    /// Create a firm owned by `vendor_id` and append it to the vendor's firm list.
    ///
    /// The firm insert and the vendor append are two separate writes; a failure
    /// in between leaves the firm without its back-reference. The append itself
    /// is a single store operation, so concurrent creates for one vendor all land.
    #[tracing::instrument(skip_all, fields(vendor_id = %vendor_id))]
    pub async fn create_firm(
        &self,
        vendor_id: VendorId,
        details: NewFirm,
        image: Option<UploadedFile>,
    ) -> Result<Firm, ServiceError> {
        if self.vendors.find_by_id(&vendor_id).await?.is_none() {
            return Err(ServiceError::NotFound("Vendor not found"));
        }

        let firm = Firm::create(FirmId::new(), vendor_id, details)?;

        let stored = match image {
            Some(file) => Some(self.uploads.save(&file).await?),
            None => None,
        };

        let firm = self.firms.insert(firm.with_image(stored)).await?;

        let linked = self
            .vendors
            .push_reference(&vendor_id, Vendor::FIRMS_FIELD, &firm.id_typed().to_string())
            .await?;
        if !linked {
            tracing::warn!(firm_id = %firm.id_typed(), "vendor vanished before firm could be linked");
        }

        tracing::info!(firm_id = %firm.id_typed(), "firm created");
        Ok(firm)
    }

    /// Delete a firm by id and return the removed record.
    ///
    /// Products of the firm are left in place. The vendor's firm list is only
    /// pruned when `detach_on_delete` is on.
    #[tracing::instrument(skip_all, fields(firm_id = %firm_id))]
    pub async fn delete_firm_by_id(&self, firm_id: FirmId) -> Result<Firm, ServiceError> {
        let firm = self
            .firms
            .find_by_id_and_delete(&firm_id)
            .await?
            .ok_or(ServiceError::NotFound("Firm not found"))?;

        if self.detach_on_delete {
            self.vendors
                .pull_reference(&firm.vendor(), Vendor::FIRMS_FIELD, &firm_id.to_string())
                .await?;
        }

        tracing::info!("firm deleted");
        Ok(firm)
    }
}
