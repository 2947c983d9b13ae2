//! Reservation lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::reservation::{CreateReservation, Reservation},
};

use super::AuthenticatedUser;

/// Reserve a book using credits
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Invalid window or payload"),
        (status = 404, description = "Book not available"),
        (status = 422, description = "Insufficient credits")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let borrower = state.services.profiles.get_or_create(&claims).await?;
    let reservation = state
        .services
        .reservations
        .create(borrower.id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List the caller's reservations
#[utoipa::path(
    get,
    path = "/reservations/mine",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's reservations", body = Vec<Reservation>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let subject = claims.subject_id()?;
    let reservations = state
        .services
        .reservations
        .list_for_borrower(subject)
        .await?;
    Ok(Json(reservations))
}

/// Activate a pending reservation (book owner hands the book over)
#[utoipa::path(
    post,
    path = "/reservations/{id}/activate",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation activated", body = Reservation),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Not pending")
    )
)]
pub async fn activate_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let actor = claims.subject_id()?;
    let reservation = state.services.reservations.activate(id, actor).await?;
    Ok(Json(reservation))
}

/// Complete an active reservation (book returned to its owner)
#[utoipa::path(
    post,
    path = "/reservations/{id}/complete",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation completed", body = Reservation),
        (status = 403, description = "Not the book owner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Not active")
    )
)]
pub async fn complete_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let actor = claims.subject_id()?;
    let reservation = state.services.reservations.complete(id, actor).await?;
    Ok(Json(reservation))
}

/// Cancel a reservation and refund its credits
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 403, description = "Neither borrower nor book owner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Already terminal")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let actor = claims.subject_id()?;
    let reservation = state.services.reservations.cancel(id, actor).await?;
    Ok(Json(reservation))
}
