//! Auth Gate
//!
//! Bearer-token verification in front of the session-creation route. The
//! verification mechanism itself is an external capability behind
//! [`TokenVerifier`]; this module only extracts the token and normalizes
//! every failure to a single 401. Verification completes before any payment
//! provider call is issued.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ApiError;
use crate::state::AppState;

/// Why a token failed verification. Logged, never sent to the caller.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("token rejected: {0}")]
    Rejected(String),

    #[error("verifier unreachable: {0}")]
    Unreachable(String),
}

/// Identity-token verification capability
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<(), VerifyError>;
}

/// Verifier backed by an external identity service over HTTP
pub struct HttpTokenVerifier {
    http: reqwest::Client,
    verify_url: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
}

impl HttpTokenVerifier {
    pub fn new(http: reqwest::Client, verify_url: impl Into<String>) -> Self {
        Self {
            http,
            verify_url: verify_url.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<(), VerifyError> {
        let response = self
            .http
            .post(&self.verify_url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| VerifyError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VerifyError::Rejected(format!(
                "identity service returned {}",
                response.status()
            )));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| VerifyError::Unreachable(e.to_string()))?;

        if body.valid {
            Ok(())
        } else {
            Err(VerifyError::Rejected("token marked invalid".into()))
        }
    }
}

/// Route-layer middleware: reject unauthenticated requests before the
/// handler (and therefore before any provider call) runs.
///
/// A missing `Authorization` header fails without consulting the verifier;
/// a header with no token segment counts as an invalid token. Every
/// verifier error collapses to [`ApiError::Unauthenticated`] so internals
/// never leak to the caller.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(header) = header else {
        return Err(ApiError::Unauthenticated);
    };

    let token = header
        .split_whitespace()
        .nth(1)
        .ok_or(ApiError::Unauthenticated)?;

    match state.verifier.verify(token).await {
        Ok(()) => Ok(next.run(request).await),
        Err(e) => {
            tracing::debug!("token verification failed: {e}");
            Err(ApiError::Unauthenticated)
        }
    }
}
