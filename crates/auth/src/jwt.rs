//! Signature verification for vendor bearer tokens.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{TokenValidationError, VendorClaims, validate_claims};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("malformed or unsigned token: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a raw bearer token and yields its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<VendorClaims, JwtError>;
}

/// HMAC-SHA256 validator with a shared secret.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in our own RFC3339 claims, checked by `validate_claims`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<VendorClaims, JwtError> {
        let data = jsonwebtoken::decode::<VendorClaims>(token, &self.key, &self.validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
