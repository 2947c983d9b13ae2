//! Credit ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::CreditEventType;

/// One row of the append-only credits ledger. Amounts are signed:
/// debits are negative, grants and refunds positive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CreditsHistory {
    pub id: i32,
    pub user_id: Uuid,
    pub amount: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub event_type: CreditEventType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Current balance, always derivable from the ledger sum
#[derive(Debug, Serialize, ToSchema)]
pub struct CreditBalance {
    pub credits: i32,
}

/// Bonus claim result returned to the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct BonusClaim {
    pub amount: i32,
    pub credits: i32,
}
