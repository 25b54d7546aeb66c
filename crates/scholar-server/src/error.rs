//! API Error Mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use scholar_payments::PaymentError;

/// Errors surfaced to HTTP callers, one status code each.
///
/// None of these are retried internally; a provider failure on create or
/// retrieve reaches the caller on the first attempt.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized access")]
    Unauthenticated,

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("payment provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::SessionNotFound(id) => ApiError::SessionNotFound(id),
            PaymentError::Provider(msg) | PaymentError::Config(msg) => ApiError::Provider(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Unauthorized access".to_string(),
            ),
            ApiError::Validation(detail) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", detail.clone())
            }
            ApiError::SessionNotFound(_) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Checkout session not found".to_string(),
            ),
            ApiError::Provider(detail) => {
                // Detail stays in the logs; the caller gets a stable message.
                tracing::error!("payment provider failure: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PAYMENT_PROVIDER_ERROR",
                    "Payment processing failed. Please try again.".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}
