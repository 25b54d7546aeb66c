//! HTTP Handlers

use axum::{
    Json, Router, middleware,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::Serialize;

use scholar_payments::{OutcomeKind, PaymentRequest};

use crate::auth::require_bearer;
use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub url: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway: state.checkout.gateway_name().to_string(),
    })
}

/// Create a checkout session for an application's fees.
///
/// Auth is enforced by the route layer before this runs. The response
/// carries only the provider redirect URL; nothing is stored locally.
pub async fn create_payment_session(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let session = state.checkout.create(request).await?;

    Ok(Json(CreateSessionResponse {
        url: session.redirect_url,
    }))
}

/// Outcome for the success redirect leg
pub async fn payment_success(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<scholar_payments::NormalizedOutcome>, ApiError> {
    let outcome = state
        .checkout
        .retrieve_outcome(&session_id, OutcomeKind::Success)
        .await?;
    Ok(Json(outcome))
}

/// Outcome for the failure redirect leg, including live payment status
pub async fn payment_failure(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<scholar_payments::NormalizedOutcome>, ApiError> {
    let outcome = state
        .checkout
        .retrieve_outcome(&session_id, OutcomeKind::Failure)
        .await?;
    Ok(Json(outcome))
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router.
///
/// Only session creation sits behind the auth gate; the redirect legs are
/// read by the payer's browser coming back from the provider and carry no
/// credential.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/create-payment-session", post(create_payment_session))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(protected)
        .route("/payment-success/{session_id}", get(payment_success))
        .route("/payment-failure/{session_id}", get(payment_failure))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use scholar_payments::{
        CheckoutManager, MockGateway, PaymentStatus, SessionMetadata, SessionRecord,
    };

    use super::*;
    use crate::auth::{TokenVerifier, VerifyError};

    const GOOD_TOKEN: &str = "good-token";

    struct StubVerifier;

    #[async_trait]
    impl TokenVerifier for StubVerifier {
        async fn verify(&self, token: &str) -> Result<(), VerifyError> {
            if token == GOOD_TOKEN {
                Ok(())
            } else {
                Err(VerifyError::Rejected("unknown token".into()))
            }
        }
    }

    fn test_app() -> (Arc<MockGateway>, Router) {
        let gateway = Arc::new(MockGateway::new());
        let state = AppState {
            checkout: Arc::new(CheckoutManager::new(
                gateway.clone(),
                "https://scholarstream.app",
            )),
            verifier: Arc::new(StubVerifier),
        };
        (gateway, router(state))
    }

    fn create_request(auth_header: Option<&str>) -> Request<Body> {
        let body = json!({
            "applicationFees": 50,
            "tuitionFees": 100,
            "serviceCharge": 10,
            "userEmail": "a@b.com",
            "scholarshipId": "sch-42",
            "scholarshipName": "Global Merit Award",
            "universityName": "MIT",
        });

        let mut builder = Request::builder()
            .method("POST")
            .uri("/create-payment-session")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_without_auth_is_401_and_no_provider_call() {
        let (gateway, app) = test_app();

        let response = app.oneshot(create_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNAUTHENTICATED");
        assert_eq!(gateway.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_with_malformed_bearer_is_401() {
        let (gateway, app) = test_app();

        // Scheme prefix with no token segment
        let response = app.oneshot(create_request(Some("Bearer"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(gateway.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_with_bad_token_is_401() {
        let (gateway, app) = test_app();

        let response = app
            .oneshot(create_request(Some("Bearer not-the-token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(gateway.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_returns_redirect_url() {
        let (gateway, app) = test_app();

        let response = app
            .oneshot(create_request(Some("Bearer good-token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["url"].as_str().unwrap().starts_with("https://"));

        let specs = gateway.created_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].amount_minor, 16000);
        assert_eq!(specs[0].metadata.scholarship_id, "sch-42");
        assert_eq!(specs[0].metadata.university_name, "MIT");
    }

    #[tokio::test]
    async fn test_create_provider_outage_is_502() {
        let (gateway, app) = test_app();
        gateway.fail_provider();

        let response = app
            .oneshot(create_request(Some("Bearer good-token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "PAYMENT_PROVIDER_ERROR");
    }

    #[tokio::test]
    async fn test_create_malformed_body_is_400() {
        let (_, app) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/create-payment-session")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, "Bearer good-token")
            .body(Body::from("{\"userEmail\": 42}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    fn seeded_session() -> SessionRecord {
        SessionRecord {
            id: "cs_test_seeded".into(),
            amount_total: 16000,
            customer_email: "a@b.com".into(),
            metadata: SessionMetadata {
                scholarship_id: "sch-42".into(),
                scholarship_name: "Global Merit Award".into(),
                university_name: "MIT".into(),
            },
            payment_status: PaymentStatus::Unpaid,
        }
    }

    #[tokio::test]
    async fn test_payment_success_outcome() {
        let (gateway, app) = test_app();
        gateway.seed_session(seeded_session());

        let request = Request::builder()
            .uri("/payment-success/cs_test_seeded")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["amount"], 160.0);
        assert_eq!(body["email"], "a@b.com");
        assert_eq!(body["scholarshipId"], "sch-42");
        assert_eq!(body["universityName"], "MIT");
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_payment_failure_outcome() {
        let (gateway, app) = test_app();
        gateway.seed_session(seeded_session());

        let request = Request::builder()
            .uri("/payment-failure/cs_test_seeded")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "unpaid");
        assert_eq!(body["amount"], 160.0);
        assert!(body.get("universityName").is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (_, app) = test_app();

        let request = Request::builder()
            .uri("/payment-success/cs_test_unknown")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = test_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["gateway"], "mock");
    }
}
