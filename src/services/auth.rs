//! Identity token verification
//!
//! Tokens are issued by an external identity provider and verified with
//! RS256. A locally configured public key takes priority and never
//! touches the network. Without one, the issuer's key set is fetched
//! from the JWKS endpoint and cached process-wide: populated lazily,
//! never proactively expired, refreshed once when verification fails
//! (key rotation) before giving up.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::profile::IdentityClaims,
};

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    http: reqwest::Client,
    key_set: Arc<RwLock<Option<JwkSet>>>,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            key_set: Arc::new(RwLock::new(None)),
        }
    }

    /// Verify a bearer token and return its claims
    pub async fn verify_token(&self, token: &str) -> AppResult<IdentityClaims> {
        if let Some(pem) = &self.config.public_key {
            return self.verify_with_public_key(token, pem);
        }
        self.verify_with_key_set(token).await
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }

    /// Fast path: configured RSA public key, no fallback on failure
    fn verify_with_public_key(&self, token: &str, pem: &str) -> AppResult<IdentityClaims> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid configured public key: {}", e)))?;

        let data = decode::<IdentityClaims>(token, &key, &self.validation())
            .map_err(|e| AppError::Unauthenticated(format!("Invalid token: {}", e)))?;

        Ok(data.claims)
    }

    async fn verify_with_key_set(&self, token: &str) -> AppResult<IdentityClaims> {
        let header = decode_header(token)
            .map_err(|e| AppError::Unauthenticated(format!("Malformed token: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthenticated("Token has no key id".to_string()))?;

        // Stale or missing key: refresh the set once and retry
        match self.try_cached_key(token, &kid).await {
            Ok(claims) => Ok(claims),
            Err(_) => {
                self.refresh_key_set().await?;
                self.try_cached_key(token, &kid).await
            }
        }
    }

    /// Verify against the cached key set without refreshing it
    async fn try_cached_key(&self, token: &str, kid: &str) -> AppResult<IdentityClaims> {
        let guard = self.key_set.read().await;
        let set = guard
            .as_ref()
            .ok_or_else(|| AppError::Unauthenticated("Key set not loaded".to_string()))?;

        let jwk = set.find(kid).ok_or_else(|| {
            AppError::Unauthenticated(format!("No signing key with id {}", kid))
        })?;

        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AppError::Unauthenticated(format!("Unusable signing key: {}", e)))?;

        let data = decode::<IdentityClaims>(token, &key, &self.validation())
            .map_err(|e| AppError::Unauthenticated(format!("Invalid token: {}", e)))?;

        Ok(data.claims)
    }

    /// Fetch the key set from the issuer and swap it in. Last write wins;
    /// all fetches come from the same trusted endpoint.
    async fn refresh_key_set(&self) -> AppResult<()> {
        let url = self.config.jwks_url.as_ref().ok_or_else(|| {
            AppError::Internal("Neither auth.public_key nor auth.jwks_url is configured".to_string())
        })?;

        let set: JwkSet = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Internal(format!("Failed to fetch key set: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Malformed key set: {}", e)))?;

        tracing::info!("Refreshed identity key set ({} keys)", set.keys.len());

        *self.key_set.write().await = Some(set);
        Ok(())
    }
}
