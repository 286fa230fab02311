use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use tracing::debug;

use super::AuthError;

/// Source of the identity provider's public signing keys
#[async_trait]
pub trait JwksProvider: Send + Sync {
    async fn key_set(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches `/.well-known/jwks.json` on every verification
pub struct RemoteJwks {
    url: String,
    client: reqwest::Client,
}

impl RemoteJwks {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { url: url.into(), client }
    }
}

#[async_trait]
impl JwksProvider for RemoteJwks {
    async fn key_set(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching JWKS from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::error!("JWKS request to {} failed: {}", self.url, e);
                AuthError::keys_unavailable("Unable to fetch signing keys.")
            })?;

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::error!("JWKS response from {} is not a key set: {}", self.url, e);
            AuthError::keys_unavailable("Unable to fetch signing keys.")
        })
    }
}

/// Fixed key set, for tests and offline development
pub struct StaticJwks(pub JwkSet);

impl StaticJwks {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl JwksProvider for StaticJwks {
    async fn key_set(&self) -> Result<JwkSet, AuthError> {
        Ok(self.0.clone())
    }
}
