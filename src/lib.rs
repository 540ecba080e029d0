//! Visitor Log
//!
//! Front desk sign-in server: a REST JSON API and a small HTML form for
//! recording visitors, backed by a single PostgreSQL table.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
