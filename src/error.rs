//! Error types for the visitor log server

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::visitor::VisitorField;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No valid data provided for validation")]
    NoDataProvided,

    #[error("Invalid input from {attribute} with value {}: {}", display_value(.value), .attribute.hint())]
    InvalidInput { attribute: VisitorField, value: Value },

    #[error(
        "Unsupported field used: {0}. Supported field names are: name, age, dateOfVisit, timeOfVisit, assistorName, comments"
    )]
    UnsupportedField(String),

    #[error("The Visitor with the id: {0} does not exist")]
    NonExistentVisitor(i32),

    #[error("You can only update one field at a time")]
    MultiFieldUpdateRejected,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(attribute: VisitorField, value: impl Into<Value>) -> Self {
        AppError::InvalidInput {
            attribute,
            value: value.into(),
        }
    }

    /// HTTP status derived from the error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoDataProvided
            | AppError::InvalidInput { .. }
            | AppError::UnsupportedField(_)
            | AppError::MultiFieldUpdateRejected => StatusCode::BAD_REQUEST,
            AppError::NonExistentVisitor(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to a client; backend details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Strings print bare, everything else as JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `error`
    pub status: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            status: "error".to_string(),
            message: self.public_message(),
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        AppError::NoDataProvided
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!("Rejected form body: {}", rejection.body_text());
        AppError::NoDataProvided
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_input_message() {
        let err = AppError::invalid_input(VisitorField::Name, json!(12345));
        assert_eq!(
            err.to_string(),
            "Invalid input from name with value 12345: The name should at least contain the first name \
             of the visitor and/or the last name of the visitor i.e \"Spider Man\"."
        );

        let err = AppError::invalid_input(VisitorField::DateOfVisit, "0102/18/20");
        assert!(err
            .to_string()
            .starts_with("Invalid input from dateOfVisit with value 0102/18/20: "));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NoDataProvided.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::MultiFieldUpdateRejected.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedField("email".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NonExistentVisitor(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_non_existent_message() {
        assert_eq!(
            AppError::NonExistentVisitor(7).to_string(),
            "The Visitor with the id: 7 does not exist"
        );
    }

    #[test]
    fn test_database_message_is_opaque() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Database error");
    }
}
