use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use storefront_catalog::{NewFirm, NewProduct, parse_flag};
use storefront_core::DomainResult;
use storefront_infra::UploadedFile;

use crate::app::errors;

/// The only multipart field accepted as a file.
pub const IMAGE_FIELD: &str = "image";

// -------------------------
// Multipart request bodies
// -------------------------

/// Text fields (repeatable, in arrival order) plus at most one `image` file.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    image: Option<UploadedFile>,
}

impl MultipartForm {
    /// First value of a text field, or `""` when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_default()
    }

    pub fn optional_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(|values| values.first()).cloned()
    }

    /// Every value of a repeated text field.
    pub fn all(&self, name: &str) -> Vec<String> {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn into_new_firm(self) -> (NewFirm, Option<UploadedFile>) {
        let details = NewFirm {
            firm_name: self.text("firmName"),
            area: self.text("area"),
            category: self.all("category"),
            region: self.all("region"),
            offer: self.optional_text("offer"),
        };
        (details, self.image)
    }

    pub fn into_new_product(self) -> DomainResult<(NewProduct, Option<UploadedFile>)> {
        let details = NewProduct {
            product_name: self.text("productName"),
            price: self.text("price"),
            category: self.all("category"),
            bestseller: parse_flag("bestseller", &self.text("bestseller"))?,
            description: self.optional_text("description"),
        };
        Ok((details, self.image))
    }
}

/// Drain a multipart body.
///
/// A file under any field other than `image`, or a second `image` file, is
/// rejected. A file part with an empty file name (browser "no file chosen")
/// counts as no file.
pub async fn read_multipart(mut multipart: Multipart) -> Result<MultipartForm, axum::response::Response> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) if file_name.is_empty() => continue,
            Some(file_name) => {
                if name != IMAGE_FIELD || form.image.is_some() {
                    return Err(errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "unexpected_field",
                        format!("unexpected file field {name:?}"),
                    ));
                }
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.image = Some(UploadedFile {
                    original_name: file_name,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.entry(name).or_default().push(value);
            }
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> axum::response::Response {
    errors::json_error(err.status(), "invalid_multipart", err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> MultipartForm {
        let mut f = MultipartForm::default();
        for (k, v) in pairs {
            f.fields.entry(k.to_string()).or_default().push(v.to_string());
        }
        f
    }

    #[test]
    fn firm_form_collects_repeated_fields() {
        let (details, image) = form(&[
            ("firmName", "Spice Route"),
            ("area", "HSR"),
            ("category", "veg"),
            ("category", "non-veg"),
            ("region", "chinese"),
        ])
        .into_new_firm();

        assert_eq!(details.firm_name, "Spice Route");
        assert_eq!(details.category, vec!["veg", "non-veg"]);
        assert_eq!(details.region, vec!["chinese"]);
        assert_eq!(details.offer, None);
        assert!(image.is_none());
    }

    #[test]
    fn product_form_parses_bestseller() {
        let (details, _) = form(&[
            ("productName", "Idli"),
            ("price", "40"),
            ("bestseller", "true"),
        ])
        .into_new_product()
        .unwrap();
        assert!(details.bestseller);

        let (details, _) = form(&[("productName", "Idli"), ("price", "40")])
            .into_new_product()
            .unwrap();
        assert!(!details.bestseller);
    }

    #[test]
    fn product_form_rejects_non_boolean_bestseller() {
        let err = form(&[("productName", "Idli"), ("price", "40"), ("bestseller", "often")])
            .into_new_product()
            .unwrap_err();
        assert!(err.to_string().contains("bestseller"));
    }
}
