//! Profiles repository for database operations

use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Entity},
    models::profile::Profile,
};

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profile WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Profile, format!("Profile {}", id)))
    }

    /// Get profile by ID, creating an empty one if the subject has never
    /// been seen before. Identity is issued externally, so first contact
    /// happens here.
    pub async fn ensure(&self, id: Uuid, username: Option<&str>) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profile (id, username, role, credits, updated_at)
            VALUES ($1, $2, 'parent', 0, NOW())
            ON CONFLICT (id) DO UPDATE SET updated_at = profile.updated_at
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Load a profile with a row lock, serializing concurrent credit
    /// mutations for the same user on this transaction.
    pub async fn lock_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profile WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Profile, format!("Profile {}", id)))
    }
}
