use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::VendorId;

/// JWT claims model (transport-agnostic).
///
/// The minimal set of claims expected once a vendor token has been decoded and
/// its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorClaims {
    /// Subject: the authenticated vendor.
    pub sub: VendorId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::jwt`].
pub fn validate_claims(claims: &VendorClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> VendorClaims {
        VendorClaims {
            sub: VendorId::new(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn accepts_within_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), Duration::minutes(10));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn rejects_expired() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(20), Duration::minutes(10));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_future_issue() {
        let now = Utc::now();
        let c = claims(now + Duration::minutes(5), Duration::minutes(10));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, Duration::zero());
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
