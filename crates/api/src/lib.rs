//! HTTP API: firm and product management over the marketplace catalog.

pub mod app;
pub mod context;
pub mod middleware;
