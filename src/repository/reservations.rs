//! Reservations repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Entity},
    models::{enums::ReservationStatus, reservation::Reservation},
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load a reservation with a row lock so concurrent lifecycle
    /// operations on the same reservation serialize.
    pub async fn lock_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservation WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Reservation, format!("Reservation {}", id)))
    }

    /// List reservations made by a borrower, newest first
    pub async fn list_by_borrower(&self, borrower_id: Uuid) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservation WHERE borrower_id = $1 ORDER BY created_at DESC",
        )
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Insert a pending reservation inside the caller's transaction
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        borrower_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        credits_used: i32,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservation (
                book_id, borrower_id, status, start_date, end_date,
                credits_used, created_at, updated_at
            )
            VALUES ($1, $2, 'pending', $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(borrower_id)
        .bind(start_date)
        .bind(end_date)
        .bind(credits_used)
        .fetch_one(&mut **tx)
        .await?;

        Ok(reservation)
    }

    /// Move a reservation to `to` only if it is currently in one of
    /// `allowed_from`. Returns the updated row, or None when the guard
    /// did not match (already moved by a concurrent request).
    pub async fn set_status_if(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        allowed_from: &[ReservationStatus],
        to: ReservationStatus,
    ) -> AppResult<Option<Reservation>> {
        let from: Vec<String> = allowed_from.iter().map(|s| s.as_str().to_string()).collect();

        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservation
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = ANY($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&from)
        .bind(to)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(updated)
    }

    /// Whether any non-terminal reservation still references the book
    pub async fn book_has_open_reservations(&self, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservation
                WHERE book_id = $1 AND status IN ('pending', 'active')
            )
            "#,
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
