use serde::{Deserialize, Serialize};

use storefront_core::{Entity, FirmId, VendorId};

/// Vendor account: the owner of one or more firms.
///
/// Vendors are referenced by the firm workflow, never created by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    id: VendorId,
    username: String,
    email: String,
    #[serde(default)]
    firms: Vec<FirmId>,
}

impl Vendor {
    /// JSON field holding the firm back-references.
    pub const FIRMS_FIELD: &'static str = "firms";

    pub fn new(id: VendorId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            firms: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> VendorId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Firm back-references in creation order.
    pub fn firms(&self) -> &[FirmId] {
        &self.firms
    }
}

impl Entity for Vendor {
    type Id = VendorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firm_references_serialize_under_firms_field() {
        let firm = FirmId::new();
        let json = serde_json::json!({
            "id": VendorId::new().to_string(),
            "username": "asha",
            "email": "asha@example.com",
            "firms": [firm.to_string()],
        });
        let vendor: Vendor = serde_json::from_value(json).unwrap();
        assert_eq!(vendor.firms(), &[firm]);
        assert_eq!(serde_json::to_value(&vendor).unwrap()[Vendor::FIRMS_FIELD][0], firm.to_string());
    }

    #[test]
    fn missing_firm_list_deserializes_empty() {
        let id = VendorId::new();
        let json = serde_json::json!({
            "id": id.to_string(),
            "username": "asha",
            "email": "asha@example.com",
        });
        let vendor: Vendor = serde_json::from_value(json).unwrap();
        assert!(vendor.firms().is_empty());
    }
}
