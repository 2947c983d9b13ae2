//! Domain enums stored as text columns

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

macro_rules! text_enum_sqlx {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                let s: String = self.as_str().to_string();
                <String as Encode<Postgres>>::encode(s, buf)
            }
        }
    };
}

/// Profile role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Parent,
    Kid,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Parent => "parent",
            UserRole::Kid => "kid",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(UserRole::Parent),
            "kid" => Ok(UserRole::Kid),
            other => Err(format!("Invalid user role: {}", other)),
        }
    }
}

text_enum_sqlx!(UserRole);

/// What the owner intends to do with a listed book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Giveaway,
    Sell,
    Share,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Giveaway => "giveaway",
            Intent::Sell => "sell",
            Intent::Share => "share",
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "giveaway" => Ok(Intent::Giveaway),
            "sell" => Ok(Intent::Sell),
            "share" => Ok(Intent::Share),
            other => Err(format!("Invalid intent: {}", other)),
        }
    }
}

text_enum_sqlx!(Intent);

/// Reservation lifecycle state
///
/// `pending → active → completed`, with cancellation allowed from
/// `pending` and `active`. Completed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Whether the state machine allows moving to `next` from here
    pub fn may_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Active, Completed) | (Pending, Cancelled) | (Active, Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "active" => Ok(ReservationStatus::Active),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("Invalid reservation status: {}", other)),
        }
    }
}

text_enum_sqlx!(ReservationStatus);

/// Kind of credit-affecting event in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CreditEventType {
    DailyBonus,
    ShareBonus,
    Purchase,
    ReservationSpend,
    ReservationRefund,
}

impl CreditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditEventType::DailyBonus => "daily_bonus",
            CreditEventType::ShareBonus => "share_bonus",
            CreditEventType::Purchase => "purchase",
            CreditEventType::ReservationSpend => "reservation_spend",
            CreditEventType::ReservationRefund => "reservation_refund",
        }
    }
}

impl std::str::FromStr for CreditEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily_bonus" => Ok(CreditEventType::DailyBonus),
            "share_bonus" => Ok(CreditEventType::ShareBonus),
            "purchase" => Ok(CreditEventType::Purchase),
            "reservation_spend" => Ok(CreditEventType::ReservationSpend),
            "reservation_refund" => Ok(CreditEventType::ReservationRefund),
            other => Err(format!("Invalid credit event type: {}", other)),
        }
    }
}

text_enum_sqlx!(CreditEventType);
