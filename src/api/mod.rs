//! API handlers for Bookyard REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod profiles;
pub mod reservations;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::profile::IdentityClaims, AppState};

/// Extractor for the verified identity carried by the bearer token
pub struct AuthenticatedUser(pub IdentityClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthenticated("Missing authorization header".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthenticated("Invalid authorization header format".to_string())
        })?;

        let claims = state.services.auth.verify_token(token).await?;

        Ok(AuthenticatedUser(claims))
    }
}
