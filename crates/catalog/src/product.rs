use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, FirmId, ProductId};

use crate::firm::clean_tags;
use crate::{optional, required};

/// Caller-supplied details for a new product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    /// Display price as entered by the vendor (e.g. "249", "₹120").
    pub price: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// A sellable item listed by exactly one firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    product_name: String,
    price: String,
    #[serde(default)]
    category: Vec<String>,
    #[serde(default)]
    bestseller: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    firm: FirmId,
}

impl Product {
    /// Build a product listed by `firm` from validated details.
    pub fn create(id: ProductId, firm: FirmId, details: NewProduct) -> DomainResult<Self> {
        let product_name = required("productName", &details.product_name)?;
        let price = required("price", &details.price)?;

        Ok(Self {
            id,
            product_name,
            price,
            category: clean_tags(details.category),
            bestseller: details.bestseller,
            description: optional(details.description),
            image: None,
            firm,
        })
    }

    /// Attach the stored filename produced by the upload store, if any.
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn category(&self) -> &[String] {
        &self.category
    }

    pub fn bestseller(&self) -> bool {
        self.bestseller
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn firm(&self) -> FirmId {
        self.firm
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Parse a boolean form field.
///
/// Accepts `true/false`, `1/0`, `yes/no`, `on/off` (case-insensitive). A blank
/// value means "not set" and reads as `false`.
pub fn parse_flag(field: &str, raw: &str) -> DomainResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        other => Err(DomainError::validation(format!(
            "{field} must be a boolean, got {other:?}"
        ))),
    }
}
