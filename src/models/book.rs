//! Book and category models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::Intent;

/// Book row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
    pub stock_count: i32,
    pub intent: Intent,
    /// Inactive books are hidden from reservation
    pub is_active: bool,
    pub owner_id: Uuid,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create book payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 512))]
    pub title: String,
    #[validate(length(min = 1, max = 256))]
    pub author: String,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock_count: Option<i32>,
    pub intent: Option<Intent>,
    pub category_id: Option<i32>,
}

/// Update book payload; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 512))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock_count: Option<i32>,
    pub intent: Option<Intent>,
    pub is_active: Option<bool>,
    pub category_id: Option<i32>,
}

/// Book listing filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring match over title or author
    pub search: Option<String>,
    pub category_id: Option<i32>,
}
