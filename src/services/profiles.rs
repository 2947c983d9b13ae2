//! Profile and credit bonus service

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        credits::{BonusClaim, CreditsHistory},
        enums::CreditEventType,
        profile::{IdentityClaims, Profile},
    },
    repository::Repository,
};

/// Daily bonus may be claimed once per rolling 24-hour window,
/// measured from the previous daily_bonus ledger row.
const BONUS_WINDOW_HOURS: i64 = 24;

#[derive(Clone)]
pub struct ProfilesService {
    repository: Repository,
    daily_bonus_amount: i32,
}

impl ProfilesService {
    pub fn new(repository: Repository, daily_bonus_amount: i32) -> Self {
        Self {
            repository,
            daily_bonus_amount,
        }
    }

    /// Get a profile by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Profile> {
        self.repository.profiles.get_by_id(id).await
    }

    /// Get the caller's profile, creating it on first contact
    pub async fn get_or_create(&self, claims: &IdentityClaims) -> AppResult<Profile> {
        let id = claims.subject_id()?;
        self.repository
            .profiles
            .ensure(id, claims.username.as_deref())
            .await
    }

    /// The caller's credit ledger, newest first
    pub async fn credit_history(&self, id: Uuid) -> AppResult<Vec<CreditsHistory>> {
        self.repository.credits.history(id).await
    }

    /// Current credit balance
    pub async fn credit_balance(&self, id: Uuid) -> AppResult<i32> {
        self.repository.credits.get_balance(id).await
    }

    /// Grant the daily credit bonus, at most once per window
    pub async fn claim_daily_bonus(&self, profile_id: Uuid) -> AppResult<BonusClaim> {
        let mut tx = self.repository.pool.begin().await?;

        // Lock first so two concurrent claims cannot both pass the
        // window check
        self.repository
            .profiles
            .lock_for_update(&mut tx, profile_id)
            .await?;

        if let Some(last) = self
            .repository
            .credits
            .last_bonus_claim(&mut tx, profile_id)
            .await?
        {
            let elapsed = Utc::now() - last;
            if elapsed < Duration::hours(BONUS_WINDOW_HOURS) {
                return Err(AppError::AlreadyClaimed(
                    "Daily bonus already claimed in the last 24 hours".to_string(),
                ));
            }
        }

        let credits = self
            .repository
            .credits
            .apply_delta(
                &mut tx,
                profile_id,
                self.daily_bonus_amount,
                CreditEventType::DailyBonus,
                Some("Daily bonus"),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(%profile_id, amount = self.daily_bonus_amount, "Daily bonus claimed");

        Ok(BonusClaim {
            amount: self.daily_bonus_amount,
            credits,
        })
    }
}
