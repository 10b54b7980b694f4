use serde::{Deserialize, Serialize};

use storefront_core::{DomainResult, Entity, FirmId, ProductId, VendorId};

use crate::{optional, required};

/// Caller-supplied details for a new firm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFirm {
    pub firm_name: String,
    pub area: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub region: Vec<String>,
    #[serde(default)]
    pub offer: Option<String>,
}

/// A vendor's storefront.
///
/// The owning vendor is fixed at creation; there is no way to reassign it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    id: FirmId,
    firm_name: String,
    area: String,
    #[serde(default)]
    category: Vec<String>,
    #[serde(default)]
    region: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    vendor: VendorId,
    #[serde(default)]
    products: Vec<ProductId>,
}

impl Firm {
    /// JSON field holding the product back-references.
    pub const PRODUCTS_FIELD: &'static str = "products";

    /// Build a firm owned by `vendor` from validated details.
    pub fn create(id: FirmId, vendor: VendorId, details: NewFirm) -> DomainResult<Self> {
        let firm_name = required("firmName", &details.firm_name)?;
        let area = required("area", &details.area)?;

        Ok(Self {
            id,
            firm_name,
            area,
            category: clean_tags(details.category),
            region: clean_tags(details.region),
            offer: optional(details.offer),
            image: None,
            vendor,
            products: Vec::new(),
        })
    }

    /// Attach the stored filename produced by the upload store, if any.
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn id_typed(&self) -> FirmId {
        self.id
    }

    pub fn firm_name(&self) -> &str {
        &self.firm_name
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn category(&self) -> &[String] {
        &self.category
    }

    pub fn region(&self) -> &[String] {
        &self.region
    }

    pub fn offer(&self) -> Option<&str> {
        self.offer.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    /// Product back-references in creation order.
    pub fn products(&self) -> &[ProductId] {
        &self.products
    }
}

impl Entity for Firm {
    type Id = FirmId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

// Multi-valued form fields may arrive with blanks; drop them.
pub(crate) fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::DomainError;

    fn details() -> NewFirm {
        NewFirm {
            firm_name: "  Spice Route ".to_string(),
            area: "Indiranagar".to_string(),
            category: vec!["veg".to_string(), " ".to_string(), "non-veg".to_string()],
            region: vec!["south-indian".to_string()],
            offer: Some("".to_string()),
        }
    }

    #[test]
    fn create_trims_and_links_vendor() {
        let vendor = VendorId::new();
        let firm = Firm::create(FirmId::new(), vendor, details()).unwrap();

        assert_eq!(firm.firm_name(), "Spice Route");
        assert_eq!(firm.vendor(), vendor);
        assert_eq!(firm.category(), &["veg".to_string(), "non-veg".to_string()]);
        assert_eq!(firm.offer(), None);
        assert_eq!(firm.image(), None);
        assert!(firm.products().is_empty());
    }

    #[test]
    fn create_keeps_stored_image_name() {
        let firm = Firm::create(FirmId::new(), VendorId::new(), details())
            .unwrap()
            .with_image(Some("0190a1b2.png".to_string()));
        assert_eq!(firm.image(), Some("0190a1b2.png"));
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut d = details();
        d.firm_name = "   ".to_string();
        let err = Firm::create(FirmId::new(), VendorId::new(), d).unwrap_err();
        assert_eq!(err, DomainError::validation("firmName is required"));
    }

    #[test]
    fn create_rejects_missing_area() {
        let mut d = details();
        d.area = String::new();
        let err = Firm::create(FirmId::new(), VendorId::new(), d).unwrap_err();
        assert_eq!(err, DomainError::validation("area is required"));
    }

    #[test]
    fn products_default_to_empty_when_absent() {
        let json = serde_json::json!({
            "id": FirmId::new().to_string(),
            "firmName": "Spice Route",
            "area": "Indiranagar",
            "vendor": VendorId::new().to_string(),
        });
        let firm: Firm = serde_json::from_value(json).unwrap();
        assert!(firm.products().is_empty());
    }

    #[test]
    fn serializes_camel_case_without_unset_image() {
        let firm = Firm::create(FirmId::new(), VendorId::new(), details()).unwrap();
        let json = serde_json::to_value(&firm).unwrap();
        assert_eq!(json["firmName"], "Spice Route");
        assert!(json.get("image").is_none());
        assert_eq!(json[Firm::PRODUCTS_FIELD], serde_json::json!([]));
    }
}
