use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::IntoResponse,
};

use storefront_infra::UploadError;
use storefront_infra::uploads::content_type_for;

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn serve_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(image_name): Path<String>,
) -> axum::response::Response {
    match services.uploads.read(&image_name).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(&image_name))],
            bytes,
        )
            .into_response(),
        Err(UploadError::NotFound(_) | UploadError::InvalidName(_)) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "image not found")
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read stored image");
            errors::internal_error(e.to_string())
        }
    }
}
