//! Bookyard Community Book Sharing Marketplace
//!
//! A Rust implementation of the Bookyard marketplace server, providing
//! a REST JSON API for listing books, reserving them with credits, and
//! managing profiles.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
