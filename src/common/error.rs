// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::pricing::TierCode;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid price type: {0}")]
    InvalidTier(String),

    #[error("Tier not entitled")]
    TierNotEntitled,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Admin role required")]
    AdminRequired,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Product code already exists")]
    ProductCodeExists,

    #[error("Account already exists ({0})")]
    AccountExists(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Wire shape of every error response: a stable `code` next to a readable
/// `error`, plus optional structured `details`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self { status, code, error: error.into(), details: None }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "One or more fields are invalid.")
                    .with_details(Value::Object(details))
            }
            AppError::InvalidTier(_) => {
                let allowed: Vec<&str> = TierCode::ALL.iter().map(|t| t.as_str()).collect();
                ApiError::new(StatusCode::BAD_REQUEST, "INVALID_TIER", "Invalid price type.")
                    .with_details(json!({ "allowed": allowed }))
            }
            AppError::TierNotEntitled => {
                ApiError::new(StatusCode::FORBIDDEN, "TIER_NOT_ENTITLED", "Tier not entitled.")
            }
            AppError::InvalidCredentials => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password.",
            ),
            AppError::InvalidToken => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Authentication token is invalid or missing.",
            ),
            AppError::AdminRequired => {
                ApiError::new(StatusCode::FORBIDDEN, "ADMIN_REQUIRED", "Please sign in as admin.")
            }
            AppError::ProductNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND", "Product not found.")
            }
            AppError::CustomerNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND", "Customer not found.")
            }
            AppError::ProductCodeExists => ApiError::new(
                StatusCode::CONFLICT,
                "PRODUCT_CODE_EXISTS",
                "Product code already exists.",
            ),
            AppError::AccountExists(field) => {
                ApiError::new(StatusCode::CONFLICT, "ACCOUNT_EXISTS", "Account already exists.")
                    .with_details(json!({ "field": field }))
            }

            // Everything else is opaque to the caller; the detail goes to the log only.
            e => {
                tracing::error!("Internal server error: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred.",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error,
            "code": self.code,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tier_lists_allowed_codes() {
        let api = AppError::InvalidTier("XYZ".into()).to_api_error();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.code, "INVALID_TIER");
        assert_eq!(
            api.details,
            Some(json!({ "allowed": ["BBCL", "BBPT", "BL", "BLVIP", "HONDA247"] }))
        );
    }

    #[test]
    fn authorization_and_validation_failures_have_distinct_statuses() {
        let denied = AppError::TierNotEntitled.to_api_error();
        let invalid = AppError::InvalidTier("x".into()).to_api_error();
        assert_eq!(denied.status, StatusCode::FORBIDDEN);
        assert_ne!(denied.status, invalid.status);
        assert_ne!(denied.code, invalid.code);
    }

    #[test]
    fn database_errors_are_opaque() {
        let api = AppError::DatabaseError(sqlx::Error::RowNotFound).to_api_error();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, "INTERNAL_ERROR");
        assert!(!api.error.contains("RowNotFound"));
        assert!(api.details.is_none());
    }
}
