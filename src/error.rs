// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::models::NullField;
use crate::database::pagination::InvalidPage;
use crate::database::DatabaseError;
use crate::identity::ProvisionError;

/// HTTP API error. The body always carries the canonical message for the
/// status; the `String` payloads are internal reasons that only reach logs.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized (guard failures keep their own code and description)
    Unauthorized(AuthError),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 422 Unprocessable Entity
    UnprocessableEntity {
        reason: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed => 405,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Client-facing message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(_) => "bad request",
            ApiError::Unauthorized(err) => &err.description,
            ApiError::NotFound(_) => "resource not found",
            ApiError::MethodNotAllowed => "method not allowed",
            ApiError::UnprocessableEntity { .. } => "unprocessable",
            ApiError::InternalServerError(_) => "internal server error",
            ApiError::ServiceUnavailable(_) => "service unavailable",
        }
    }

    /// Internal reason, logged but never serialized
    pub fn reason(&self) -> &str {
        match self {
            ApiError::BadRequest(reason)
            | ApiError::NotFound(reason)
            | ApiError::InternalServerError(reason)
            | ApiError::ServiceUnavailable(reason) => reason,
            ApiError::UnprocessableEntity { reason, .. } => reason,
            ApiError::Unauthorized(err) => err.code,
            ApiError::MethodNotAllowed => "method not allowed",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Unauthorized(err) => json!({
                "success": false,
                "error": err.status_code,
                "code": err.code,
                "message": err.description,
            }),
            ApiError::UnprocessableEntity { field_errors: Some(field_errors), .. } => json!({
                "success": false,
                "error": self.status_code(),
                "message": self.message(),
                "field_errors": field_errors,
            }),
            _ => json!({
                "success": false,
                "error": self.status_code(),
                "message": self.message(),
            }),
        }
    }
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        ApiError::BadRequest(reason.into())
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        ApiError::NotFound(reason.into())
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        ApiError::UnprocessableEntity {
            reason: reason.into(),
            field_errors: None,
        }
    }

    pub fn validation(reason: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ApiError::UnprocessableEntity {
            reason: reason.into(),
            field_errors: Some(field_errors),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), "This field is required".to_string());
        Self::validation(format!("missing required field '{}'", field), field_errors)
    }

    pub fn internal_server_error(reason: impl Into<String>) -> Self {
        ApiError::InternalServerError(reason.into())
    }

    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(reason.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                ApiError::unprocessable(msg)
            }
            other => {
                // Infrastructure faults are reported the same way as bad data
                tracing::error!("Database error: {}", other);
                ApiError::unprocessable(other.to_string())
            }
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        tracing::error!("User provisioning failed: {}", err);
        ApiError::unprocessable(err.to_string())
    }
}

impl From<InvalidPage> for ApiError {
    fn from(err: InvalidPage) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<NullField> for ApiError {
    fn from(err: NullField) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(err.0.to_string(), "This field cannot be null".to_string());
        ApiError::validation(err.to_string(), field_errors)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.reason())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!("Request failed: {}", self);
        let status = match &self {
            // Every guard failure is a 401 on the wire
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };
        (status, Json(self.to_json())).into_response()
    }
}
