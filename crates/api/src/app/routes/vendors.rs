use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use storefront_core::VendorId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/all-vendors", get(list_vendors))
        .route("/single-vendor/:id", get(get_vendor))
}

pub async fn list_vendors(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.vendors.list_vendors().await {
        Ok(vendors) => (StatusCode::OK, Json(serde_json::json!({ "vendors": vendors }))).into_response(),
        Err(e) => errors::service_error_to_response("list_vendors", e),
    }
}

pub async fn get_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let vendor_id: VendorId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.vendors.vendor_profile(vendor_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => errors::service_error_to_response("get_vendor", e),
    }
}
