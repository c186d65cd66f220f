//! Unified error types for the back-office API
//!
//! `AppError` is the client-facing error: a structured code, a human-readable
//! message and optional details, serialized as `{ "error": ..., "code": ... }`
//! with the HTTP status derived from the code. `ServiceError` bridges DB-layer
//! errors (`sqlx::Error`, `BoxError`) and `AppError` so handlers can use `?`
//! propagation without manual `.map_err(|e| { tracing::error!(...); ... })`
//! boilerplate.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error codes shared with the admin frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // General
    NotFound,
    AlreadyExists,
    ValidationFailed,
    InvalidRequest,
    InternalError,

    // Authentication
    NotAuthenticated,
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,

    // Authorization
    PermissionDenied,
    AdminRequired,
    CannotDeleteAdmin,
    CannotDeleteSelf,

    // Roles
    RoleProtected,
    RoleInUse,

    // Orders
    OrderNotFound,
    InvalidOrderStatus,
    OrderAlreadyFinal,
    OrderTransitionNotAllowed,

    // Inventory
    InsufficientStock,
}

impl ErrorCode {
    /// HTTP status this error code maps to at the API boundary
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::RoleInUse
            | Self::OrderAlreadyFinal
            | Self::OrderTransitionNotAllowed
            | Self::InsufficientStock => StatusCode::CONFLICT,

            Self::ValidationFailed | Self::InvalidRequest | Self::InvalidOrderStatus => {
                StatusCode::BAD_REQUEST
            }

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied
            | Self::AdminRequired
            | Self::CannotDeleteAdmin
            | Self::CannotDeleteSelf
            | Self::RoleProtected => StatusCode::FORBIDDEN,

            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidRequest => "Invalid request",
            Self::InternalError => "Internal server error",
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin credential required",
            Self::CannotDeleteAdmin => "Master Admin cannot be deleted",
            Self::CannotDeleteSelf => "You cannot delete your own account",
            Self::RoleProtected => "Cannot delete system role",
            Self::RoleInUse => "Role is assigned to users",
            Self::OrderNotFound => "Order not found",
            Self::InvalidOrderStatus => "Invalid order status",
            Self::OrderAlreadyFinal => "Order is in a final status",
            Self::OrderTransitionNotAllowed => "Status transition not allowed",
            Self::InsufficientStock => "Insufficient inventory",
        }
    }
}

/// Application error with structured code and optional details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an already exists error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let mut body = serde_json::json!({
            "error": self.message,
            "code": self.code,
        });
        if let Some(details) = self.details {
            body["details"] = serde_json::json!(details);
        }
        (status, Json(body)).into_response()
    }
}

/// Service-layer error, only two variants.
///
/// - `Db`: Database/infrastructure errors (auto-logged, mapped to InternalError)
/// - `App`: Business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error (sqlx, SES, serde, etc.)
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_map_to_expected_http_status() {
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::InsufficientStock.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::InvalidOrderStatus.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::RoleProtected.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::RoleInUse.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn app_error_carries_custom_message_and_details() {
        let err = AppError::with_message(ErrorCode::InsufficientStock, "Insufficient inventory")
            .with_detail("variant_id", 42);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "Insufficient inventory");
        assert_eq!(
            err.details.unwrap().get("variant_id"),
            Some(&serde_json::json!(42))
        );
    }

    #[test]
    fn service_error_converts_business_errors_transparently() {
        let src = AppError::new(ErrorCode::RoleInUse);
        let service: ServiceError = src.clone().into();
        let back: AppError = service.into();
        assert_eq!(back.code, src.code);
        assert_eq!(back.message, src.message);
    }
}
