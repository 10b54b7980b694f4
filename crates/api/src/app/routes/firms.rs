use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};

use storefront_core::FirmId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::VendorContext;
use crate::middleware::{AuthState, auth_middleware};

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route(
            "/add-firm",
            post(add_firm).route_layer(axum::middleware::from_fn_with_state(auth, auth_middleware)),
        )
        .route("/:id", delete(delete_firm))
}

pub async fn add_firm(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(vendor): Extension<VendorContext>,
    multipart: Multipart,
) -> axum::response::Response {
    let form = match dto::read_multipart(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let (details, image) = form.into_new_firm();

    match services.firms.create_firm(vendor.vendor_id(), details, image).await {
        Ok(firm) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "Firm added successfully",
                "firm": firm,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response("add_firm", e),
    }
}

pub async fn delete_firm(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let firm_id: FirmId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.firms.delete_firm_by_id(firm_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Firm deleted successfully" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response("delete_firm", e),
    }
}
