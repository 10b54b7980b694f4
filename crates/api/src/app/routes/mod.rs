use axum::{Router, routing::get};

use crate::middleware::AuthState;

pub mod firms;
pub mod products;
pub mod system;
pub mod uploads;
pub mod vendors;

/// Router for all marketplace endpoints. Only firm creation needs a vendor token.
pub fn router(auth: AuthState) -> Router {
    Router::new()
        .nest("/firm", firms::router(auth))
        .nest("/product", products::router())
        .nest("/vendor", vendors::router())
        .route("/uploads/:image_name", get(uploads::serve_image))
}
