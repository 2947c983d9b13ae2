//! Profile model and identity claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::enums::UserRole;

/// Profile row. The id is the subject issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    /// Guardianship link to another profile, no ownership implied
    pub parent_id: Option<Uuid>,
    pub credits: i32,
    pub updated_at: DateTime<Utc>,
}

/// Claims carried by an externally issued identity token.
///
/// Only `sub` is trusted for authorization decisions; everything else
/// is display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    pub exp: i64,
}

impl IdentityClaims {
    /// The verified subject as a profile id
    pub fn subject_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthenticated("Token subject is not a valid id".to_string()))
    }
}
