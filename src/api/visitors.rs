//! Visitors API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::visitor::{LatestVisitor, Visitor, VisitorField, VisitorSummary, NO_VISITORS_MESSAGE},
};

use super::{DataResponse, MessageResponse};

/// Parse the `:id` path segment; anything but an integer is an invalid id
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::invalid_input(VisitorField::Id, raw))
}

/// Payload of the latest-visitor endpoint
#[derive(Serialize)]
#[serde(untagged)]
pub enum LatestPayload {
    Visitor(Visitor),
    Message(&'static str),
}

/// List all visitors (id and name)
#[utoipa::path(
    get,
    path = "/visitors",
    tag = "visitors",
    responses(
        (status = 200, description = "Visitors list, wrapped in {status, data}", body = Vec<VisitorSummary>),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_visitors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<DataResponse<Vec<VisitorSummary>>>> {
    let visitors = state.services.visitors.list_visitors().await?;
    Ok(Json(DataResponse::new(visitors)))
}

/// Create a visitor
#[utoipa::path(
    post,
    path = "/visitors",
    tag = "visitors",
    request_body = crate::models::visitor::CreateVisitor,
    responses(
        (status = 201, description = "Visitor created, wrapped in {status, data}", body = Visitor),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_visitor(
    State(state): State<crate::AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Visitor>>)> {
    let Json(data) = body?;
    let visitor = state.services.visitors.add_visitor(&data).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(visitor))))
}

/// Delete all visitors
#[utoipa::path(
    delete,
    path = "/visitors",
    tag = "visitors",
    responses(
        (status = 200, description = "Visitors deleted", body = MessageResponse),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_visitors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<MessageResponse>> {
    let outcome = state.services.visitors.delete_all_visitors().await?;
    Ok(Json(MessageResponse::new(outcome.to_string())))
}

/// Most recent visitor by date and time
#[utoipa::path(
    get,
    path = "/visitors/latest",
    tag = "visitors",
    responses(
        (status = 200, description = "Latest visitor, or a message when there are none", body = Visitor)
    )
)]
pub async fn get_latest_visitor(
    State(state): State<crate::AppState>,
) -> AppResult<Json<DataResponse<LatestPayload>>> {
    let payload = match state.services.visitors.get_latest_visitor().await? {
        LatestVisitor::Found(visitor) => LatestPayload::Visitor(visitor),
        LatestVisitor::NoVisitors => LatestPayload::Message(NO_VISITORS_MESSAGE),
    };
    Ok(Json(DataResponse::new(payload)))
}

/// Get visitor by ID
#[utoipa::path(
    get,
    path = "/visitors/{id}",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor details, wrapped in {status, data}", body = Visitor),
        (status = 400, description = "Invalid id", body = crate::error::ErrorResponse),
        (status = 404, description = "Visitor does not exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_visitor(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Visitor>>> {
    let id = parse_id(&id)?;
    let visitor = state.services.visitors.get_visitor(id).await?;
    Ok(Json(DataResponse::new(visitor)))
}

/// Update a single field of a visitor
///
/// The body must hold exactly one camelCase field, e.g. `{"name": "Thabo Mngoma"}`.
#[utoipa::path(
    put,
    path = "/visitors/{id}",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    request_body = Value,
    responses(
        (status = 200, description = "Visitor updated", body = MessageResponse),
        (status = 400, description = "Several fields or invalid value", body = crate::error::ErrorResponse),
        (status = 404, description = "Visitor does not exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_visitor(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(data) = body?;
    let fields = data
        .as_object()
        .filter(|fields| !fields.is_empty())
        .ok_or(AppError::NoDataProvided)?;
    if fields.len() > 1 {
        return Err(AppError::MultiFieldUpdateRejected);
    }
    let (field_name, value) = fields.iter().next().ok_or(AppError::NoDataProvided)?;

    let id = parse_id(&id)?;
    let message = state
        .services
        .visitors
        .update_visitor(id, field_name, value)
        .await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Delete a visitor
#[utoipa::path(
    delete,
    path = "/visitors/{id}",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor deleted", body = MessageResponse),
        (status = 404, description = "Visitor does not exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_visitor(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let message = state.services.visitors.delete_visitor(id).await?;
    Ok(Json(MessageResponse::new(message)))
}
