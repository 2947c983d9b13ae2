//! Profile and credits endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        credits::{BonusClaim, CreditBalance, CreditsHistory},
        profile::Profile,
    },
};

use super::AuthenticatedUser;

/// Get the caller's profile, creating it on first contact
#[utoipa::path(
    get,
    path = "/profiles/me",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's profile", body = Profile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_my_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = state.services.profiles.get_or_create(&claims).await?;
    Ok(Json(profile))
}

/// Get a specific profile by ID
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "profiles",
    params(
        ("id" = Uuid, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "The profile", body = Profile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state.services.profiles.get(id).await?;
    Ok(Json(profile))
}

/// Claim the daily credit bonus
#[utoipa::path(
    post,
    path = "/profiles/credits/daily-bonus",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bonus granted", body = BonusClaim),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Already claimed in the last 24 hours")
    )
)]
pub async fn claim_daily_bonus(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BonusClaim>> {
    // First contact may arrive here before any other endpoint
    let profile = state.services.profiles.get_or_create(&claims).await?;
    let claim = state.services.profiles.claim_daily_bonus(profile.id).await?;
    Ok(Json(claim))
}

/// The caller's current credit balance
#[utoipa::path(
    get,
    path = "/profiles/me/credits",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current balance", body = CreditBalance),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_my_credit_balance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CreditBalance>> {
    let profile = state.services.profiles.get_or_create(&claims).await?;
    let credits = state.services.profiles.credit_balance(profile.id).await?;
    Ok(Json(CreditBalance { credits }))
}

/// The caller's credit ledger, newest first
#[utoipa::path(
    get,
    path = "/profiles/me/credits/history",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ledger rows", body = Vec<CreditsHistory>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_my_credit_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<CreditsHistory>>> {
    let subject = claims.subject_id()?;
    let history = state.services.profiles.credit_history(subject).await?;
    Ok(Json(history))
}
