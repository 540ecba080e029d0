//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, visitors};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitor Log API",
        version = "1.0.0",
        description = "Visitor sign-in log REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Visitors
        visitors::list_visitors,
        visitors::create_visitor,
        visitors::delete_visitors,
        visitors::get_latest_visitor,
        visitors::get_visitor,
        visitors::update_visitor,
        visitors::delete_visitor,
    ),
    components(
        schemas(
            // Visitors
            crate::models::visitor::Visitor,
            crate::models::visitor::VisitorSummary,
            crate::models::visitor::CreateVisitor,
            crate::api::MessageResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "visitors", description = "Visitor sign-in records")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
