//! `storefront-auth` — vendor identity boundary.
//!
//! Token issuance lives elsewhere; this crate only turns a presented bearer
//! token into verified vendor claims. It is decoupled from HTTP and storage.

pub mod claims;
pub mod jwt;

pub use claims::{TokenValidationError, VendorClaims, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
