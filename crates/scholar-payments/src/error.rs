//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Provider call failed (network, timeout, rejected request)
    #[error("payment provider error: {0}")]
    Provider(String),

    /// Unknown or expired checkout session id
    #[error("checkout session not found: {0}")]
    SessionNotFound(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Provider(_) => "Payment processing failed. Please try again.",
            PaymentError::SessionNotFound(_) => "Checkout session not found.",
            PaymentError::Config(_) => "Service configuration error.",
        }
    }
}
