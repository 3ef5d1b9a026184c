//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::booking::AppointmentError;
use crate::schedule::ConfigurationError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Slot taken or no longer offered at commit time
    SlotUnavailable(String),
    InvalidCustomer(String),
    /// Rejected settings update
    Configuration(ConfigurationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::SlotUnavailable(msg) => (
                StatusCode::CONFLICT,
                ApiError::new("SLOT_UNAVAILABLE", msg)
                    .with_details("Pick another time from a fresh slot list"),
            ),
            AppError::InvalidCustomer(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INVALID_CUSTOMER_DATA", msg),
            ),
            AppError::Configuration(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INVALID_CONFIGURATION", e.to_string()),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::SlotNoLongerAvailable { .. } => AppError::SlotUnavailable(err.to_string()),
            AppointmentError::InvalidCustomerData(_) => AppError::InvalidCustomer(err.to_string()),
            AppointmentError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        AppError::Configuration(err)
    }
}
