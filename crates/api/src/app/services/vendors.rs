use std::sync::Arc;

use serde::Serialize;

use storefront_catalog::{Firm, Vendor};
use storefront_core::VendorId;
use storefront_infra::DocumentCollection;

use super::{Collections, ServiceError};

/// A vendor together with the firms that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorProfile {
    pub vendor: Vendor,
    pub firms: Vec<Firm>,
}

/// Read-only vendor lookups.
#[derive(Clone)]
pub struct VendorDirectory {
    vendors: Arc<dyn DocumentCollection<Vendor>>,
    firms: Arc<dyn DocumentCollection<Firm>>,
}

impl VendorDirectory {
    pub fn new(collections: &Collections) -> Self {
        Self {
            vendors: collections.vendors.clone(),
            firms: collections.firms.clone(),
        }
    }

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, ServiceError> {
        Ok(self.vendors.list().await?)
    }

    /// Firms are resolved by their `vendor` reference, not the vendor's id list.
    pub async fn vendor_profile(&self, vendor_id: VendorId) -> Result<VendorProfile, ServiceError> {
        let vendor = self
            .vendors
            .find_by_id(&vendor_id)
            .await?
            .ok_or(ServiceError::NotFound("Vendor not found"))?;

        let firms = self
            .firms
            .find_where("vendor", &serde_json::Value::String(vendor_id.to_string()))
            .await?;

        Ok(VendorProfile { vendor, firms })
    }
}
