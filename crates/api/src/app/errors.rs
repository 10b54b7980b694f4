use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_core::DomainError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(operation: &'static str, err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        ServiceError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg)
        }
        err @ (ServiceError::Store(_) | ServiceError::Upload(_)) => {
            tracing::error!(operation, error = %err, "request failed");
            internal_error(err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 500 with the underlying failure echoed back in `detail`.
pub fn internal_error(detail: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "error": "internal_error",
            "message": "Internal server error",
            "detail": detail.into(),
        })),
    )
        .into_response()
}

/// Parse a path identifier, mapping failures to a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_infra::StoreError;

    async fn body_of(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn store_failure_is_500_with_detail() {
        let err = ServiceError::Store(StoreError::Database {
            operation: "insert",
            message: "connection refused".to_string(),
        });

        let resp = service_error_to_response("add_firm", err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(resp).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "Internal server error");
        assert!(body["detail"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn not_found_keeps_client_message() {
        let resp = service_error_to_response("delete_firm", ServiceError::NotFound("Firm not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_of(resp).await;
        assert_eq!(body["message"], "Firm not found");
        assert!(body.get("detail").is_none());
    }
}
