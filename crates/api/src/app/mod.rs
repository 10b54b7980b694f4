//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services/`: firm/product managers over the document collections
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: multipart request parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, extract::DefaultBodyLimit, routing::get};
use tower::ServiceBuilder;

use storefront_auth::Hs256JwtValidator;
use storefront_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(app_with_services(config, Arc::new(services)))
}

/// Build the router around already-wired services (tests seed collections this way).
pub fn app_with_services(config: &AppConfig, services: Arc<services::AppServices>) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(auth_state))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(config.body_limit_bytes))
                .layer(Extension(services)),
        )
}
