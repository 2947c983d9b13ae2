//! Credits ledger repository
//!
//! Every credit mutation goes through [`CreditsRepository::apply_delta`],
//! which updates the balance and appends the matching history row inside
//! the caller's transaction. The balance can therefore always be
//! reconciled against the sum of history amounts.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Entity},
    models::{credits::CreditsHistory, enums::CreditEventType},
};

#[derive(Clone)]
pub struct CreditsRepository {
    pool: Pool<Postgres>,
}

impl CreditsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Current credit balance for a profile
    pub async fn get_balance(&self, profile_id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT credits FROM profile WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Profile, format!("Profile {}", profile_id)))
    }

    /// Apply a signed credit delta and append the matching ledger row.
    ///
    /// The conditional UPDATE refuses to drive the balance negative even
    /// if the caller already checked; callers keep their own check on the
    /// locked row as well. Returns the new balance.
    pub async fn apply_delta(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
        amount: i32,
        event_type: CreditEventType,
        description: Option<&str>,
    ) -> AppResult<i32> {
        let new_balance: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE profile
            SET credits = credits + $2, updated_at = NOW()
            WHERE id = $1 AND credits + $2 >= 0
            RETURNING credits
            "#,
        )
        .bind(profile_id)
        .bind(amount)
        .fetch_optional(&mut **tx)
        .await?;

        let new_balance = match new_balance {
            Some(balance) => balance,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profile WHERE id = $1)")
                        .bind(profile_id)
                        .fetch_one(&mut **tx)
                        .await?;
                if exists {
                    return Err(AppError::InsufficientCredits(format!(
                        "Balance would drop below zero (delta {})",
                        amount
                    )));
                }
                return Err(AppError::NotFound(
                    Entity::Profile,
                    format!("Profile {}", profile_id),
                ));
            }
        };

        sqlx::query(
            r#"
            INSERT INTO creditshistory (user_id, amount, type, description, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(profile_id)
        .bind(amount)
        .bind(event_type)
        .bind(description)
        .execute(&mut **tx)
        .await?;

        Ok(new_balance)
    }

    /// Timestamp of the most recent daily bonus grant, if any
    pub async fn last_bonus_claim(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
    ) -> AppResult<Option<DateTime<Utc>>> {
        let ts: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT created_at FROM creditshistory
            WHERE user_id = $1 AND type = 'daily_bonus'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ts)
    }

    /// Ledger rows for a profile, newest first
    pub async fn history(&self, profile_id: Uuid) -> AppResult<Vec<CreditsHistory>> {
        let rows = sqlx::query_as::<_, CreditsHistory>(
            "SELECT * FROM creditshistory WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
