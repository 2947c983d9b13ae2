//! Reservation engine
//!
//! Owns the reservation state machine and keeps credit movements atomic
//! with lifecycle changes: debit + spend row + insert on create, refund
//! + refund row + status change on cancel, all in one transaction. The
//! borrower's profile row is locked before any balance check so
//! concurrent requests for the same user serialize.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Entity},
    models::{
        enums::{CreditEventType, ReservationStatus},
        reservation::{CreateReservation, Reservation},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Reserve a book, spending credits
    pub async fn create(
        &self,
        borrower_id: Uuid,
        request: &CreateReservation,
    ) -> AppResult<Reservation> {
        if request.end_date <= request.start_date {
            return Err(AppError::InvalidWindow(
                "Reservation window must end after it starts".to_string(),
            ));
        }
        if request.credits_used < 0 {
            return Err(AppError::Validation(
                "credits_used must not be negative".to_string(),
            ));
        }

        let book = self.repository.books.get_by_id(request.book_id).await?;
        if !book.is_active {
            return Err(AppError::NotFound(
                Entity::Book,
                format!("Book {} is not available", book.id),
            ));
        }
        if book.owner_id == borrower_id {
            return Err(AppError::Validation(
                "Cannot reserve your own book".to_string(),
            ));
        }

        let mut tx = self.repository.pool.begin().await?;

        // Row lock serializes concurrent creates for the same borrower
        let profile = self
            .repository
            .profiles
            .lock_for_update(&mut tx, borrower_id)
            .await?;

        if profile.credits < request.credits_used {
            return Err(AppError::InsufficientCredits(format!(
                "{} credits available, {} requested",
                profile.credits, request.credits_used
            )));
        }

        self.repository
            .credits
            .apply_delta(
                &mut tx,
                borrower_id,
                -request.credits_used,
                CreditEventType::ReservationSpend,
                Some(&format!("Reserved book {}", book.id)),
            )
            .await?;

        let reservation = self
            .repository
            .reservations
            .insert(
                &mut tx,
                book.id,
                borrower_id,
                request.start_date,
                request.end_date,
                request.credits_used,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = reservation.id,
            book_id = book.id,
            %borrower_id,
            credits = request.credits_used,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// List the caller's reservations
    pub async fn list_for_borrower(&self, borrower_id: Uuid) -> AppResult<Vec<Reservation>> {
        self.repository.reservations.list_by_borrower(borrower_id).await
    }

    /// Mark a pending reservation active. Done by the book owner when
    /// the book is handed over; no credits move.
    pub async fn activate(&self, id: i32, actor: Uuid) -> AppResult<Reservation> {
        self.transition(id, actor, ReservationStatus::Active).await
    }

    /// Mark an active reservation completed. Credits stay spent; they
    /// were the cost of the loan.
    pub async fn complete(&self, id: i32, actor: Uuid) -> AppResult<Reservation> {
        self.transition(id, actor, ReservationStatus::Completed).await
    }

    async fn transition(
        &self,
        id: i32,
        actor: Uuid,
        to: ReservationStatus,
    ) -> AppResult<Reservation> {
        let mut tx = self.repository.pool.begin().await?;

        let reservation = self.repository.reservations.lock_for_update(&mut tx, id).await?;
        // Stay on this transaction's connection; a pool read here would
        // hold one connection while waiting for a second
        let book = self
            .repository
            .books
            .get_by_id_in_tx(&mut tx, reservation.book_id)
            .await?;

        if book.owner_id != actor {
            return Err(AppError::Forbidden(format!(
                "Only the book owner may mark a reservation {}",
                to
            )));
        }
        if !reservation.status.may_transition_to(to) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move a {} reservation to {}",
                reservation.status, to
            )));
        }

        let allowed_from = [reservation.status];
        let updated = self
            .repository
            .reservations
            .set_status_if(&mut tx, id, &allowed_from, to)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition(format!("Reservation {} already moved", id))
            })?;

        tx.commit().await?;

        tracing::info!(reservation_id = id, status = %to, "Reservation transitioned");

        Ok(updated)
    }

    /// Cancel a pending or active reservation, refunding the credits it
    /// consumed. Allowed for the borrower and the book owner.
    pub async fn cancel(&self, id: i32, actor: Uuid) -> AppResult<Reservation> {
        let mut tx = self.repository.pool.begin().await?;

        // The row lock makes a concurrent second cancel wait, then see
        // the terminal state; the refund happens exactly once.
        let reservation = self.repository.reservations.lock_for_update(&mut tx, id).await?;
        let book = self
            .repository
            .books
            .get_by_id_in_tx(&mut tx, reservation.book_id)
            .await?;

        if actor != reservation.borrower_id && actor != book.owner_id {
            return Err(AppError::Forbidden(
                "Only the borrower or the book owner may cancel a reservation".to_string(),
            ));
        }
        if !reservation
            .status
            .may_transition_to(ReservationStatus::Cancelled)
        {
            return Err(AppError::InvalidTransition(format!(
                "Cannot cancel a {} reservation",
                reservation.status
            )));
        }

        let updated = self
            .repository
            .reservations
            .set_status_if(
                &mut tx,
                id,
                &[ReservationStatus::Pending, ReservationStatus::Active],
                ReservationStatus::Cancelled,
            )
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition(format!("Reservation {} already moved", id))
            })?;

        self.repository
            .credits
            .apply_delta(
                &mut tx,
                reservation.borrower_id,
                reservation.credits_used,
                CreditEventType::ReservationRefund,
                Some(&format!("Refund for reservation {}", id)),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            refunded = reservation.credits_used,
            "Reservation cancelled"
        );

        Ok(updated)
    }
}
