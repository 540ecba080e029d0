//! API handlers for the visitor log endpoints

pub mod health;
pub mod openapi;
pub mod pages;
pub mod visitors;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Success envelope for reads and creations
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Success envelope for updates and deletions
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `success`
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_dir = state.config.server.public_dir.clone();

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Visitors
        .route("/visitors", get(visitors::list_visitors))
        .route("/visitors", post(visitors::create_visitor))
        .route("/visitors", delete(visitors::delete_visitors))
        .route("/visitors/latest", get(visitors::get_latest_visitor))
        .route("/visitors/:id", get(visitors::get_visitor))
        .route("/visitors/:id", put(visitors::update_visitor))
        .route("/visitors/:id", delete(visitors::delete_visitor))
        // Front desk pages
        .route("/new_visitor", get(pages::new_visitor_form))
        .route("/thank_you", post(pages::thank_you))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
