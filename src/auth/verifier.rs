use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use super::{AuthError, Claims, JwksProvider};

/// Verifies RS256 access tokens issued by the identity provider
pub struct Authorizer {
    issuer: String,
    audience: String,
    keys: Arc<dyn JwksProvider>,
}

impl Authorizer {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, keys: Arc<dyn JwksProvider>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            keys,
        }
    }

    /// Check signature, expiry, audience and issuer, then return the claims.
    /// The unverified header is read first only to pick the signing key.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::invalid_header("Unable to parse authentication token.", 400))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed.", 401))?;

        let key_set = self.keys.key_set().await?;
        let jwk = key_set
            .find(&kid)
            .ok_or_else(|| AuthError::invalid_header("Unable to find the appropriate key.", 400))?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|_| AuthError::invalid_header("Unable to find the appropriate key.", 400))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::token_expired(),
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::incorrect_claims(),
            _ => AuthError::invalid_header("Unable to parse authentication token.", 400),
        })?;

        Ok(data.claims)
    }
}
