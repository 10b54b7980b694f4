use storefront_core::VendorId;

/// Verified vendor identity for a request.
///
/// Inserted by the auth middleware; handlers never read the vendor from the
/// request body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VendorContext {
    vendor_id: VendorId,
}

impl VendorContext {
    pub fn new(vendor_id: VendorId) -> Self {
        Self { vendor_id }
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }
}
