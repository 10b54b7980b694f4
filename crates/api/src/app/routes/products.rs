use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use storefront_core::{FirmId, ProductId};

use crate::app::services::{AppServices, ServiceError};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/add-product/:id", post(add_product))
        .route("/:id/products", get(list_products))
        .route("/:id", delete(delete_product))
}

pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> axum::response::Response {
    let firm_id: FirmId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let form = match dto::read_multipart(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let (details, image) = match form.into_new_product() {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response("add_product", ServiceError::from(e)),
    };

    match services.products.create_product(firm_id, details, image).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response("add_product", e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let firm_id: FirmId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.products.products_by_firm(firm_id).await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => errors::service_error_to_response("list_products", e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.products.delete_product_by_id(product_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Product successfully deleted" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response("delete_product", e),
    }
}
