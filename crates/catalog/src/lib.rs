//! Catalog domain module.
//!
//! Vendors own firms, firms list products. This crate holds the records and the
//! rules for building them from caller input (no IO, no HTTP, no storage).

pub mod firm;
pub mod product;
pub mod vendor;

pub use firm::{Firm, NewFirm};
pub use product::{NewProduct, Product, parse_flag};
pub use vendor::Vendor;

use storefront_core::{DomainError, DomainResult};

/// Trim a required text field, rejecting blank values.
pub(crate) fn required(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank collapses to `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
