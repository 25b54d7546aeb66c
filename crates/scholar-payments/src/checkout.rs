//! Checkout Session Manager
//!
//! Orchestrates session creation and outcome retrieval. Stateless between
//! calls: each operation is exactly one gateway round-trip, never retried,
//! so a failed create cannot leave a duplicate session behind.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::error::{PaymentError, Result};
use crate::fees::FeeBreakdown;
use crate::gateway::{CreatedSession, PaymentGateway, PaymentStatus, SessionMetadata, SessionRecord, SessionSpec};

/// Placeholder the provider substitutes with the real session id when it
/// redirects the payer back to the site.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Upper bound on one gateway call; a hung provider surfaces as a provider
/// error instead of a stuck request.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Request to start a checkout for one scholarship application
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(flatten)]
    pub fees: FeeBreakdown,

    /// Payer identity hint, pre-filled on the checkout page
    pub user_email: String,

    pub scholarship_id: String,
    pub scholarship_name: String,
    #[serde(default)]
    pub university_name: String,
}

/// Which redirect leg the outcome is being read for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Domain-shaped projection of a provider session's result.
///
/// The success leg carries the university name; the failure leg carries the
/// live payment status instead. Amount is back in major units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOutcome {
    pub scholarship_id: String,
    pub email: String,
    pub amount: f64,
    pub scholarship_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
}

impl NormalizedOutcome {
    #[allow(clippy::cast_precision_loss)]
    fn from_record(record: SessionRecord, kind: OutcomeKind) -> Self {
        let SessionMetadata {
            scholarship_id,
            scholarship_name,
            university_name,
        } = record.metadata;

        let (university_name, status) = match kind {
            OutcomeKind::Success => (Some(university_name), None),
            OutcomeKind::Failure => (None, Some(record.payment_status)),
        };

        Self {
            scholarship_id,
            email: record.customer_email,
            amount: record.amount_total as f64 / 100.0,
            scholarship_name,
            university_name,
            status,
        }
    }
}

/// Drives the checkout lifecycle against a [`PaymentGateway`]
pub struct CheckoutManager {
    gateway: Arc<dyn PaymentGateway>,
    site_origin: String,
}

impl CheckoutManager {
    pub fn new(gateway: Arc<dyn PaymentGateway>, site_origin: impl Into<String>) -> Self {
        Self {
            gateway,
            site_origin: site_origin.into(),
        }
    }

    /// Name of the gateway this manager drives
    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Create a hosted checkout session for an application.
    ///
    /// Computes the amount from the fee composition, attaches the
    /// scholarship identifiers verbatim as metadata, and returns the
    /// provider's redirect URL. Nothing is persisted locally; a gateway
    /// failure surfaces immediately with no partial state.
    pub async fn create(&self, request: PaymentRequest) -> Result<CreatedSession> {
        let amount_minor = request.fees.total_minor_units();

        let spec = SessionSpec {
            product_name: request.scholarship_name.clone(),
            amount_minor,
            customer_email: request.user_email,
            metadata: SessionMetadata {
                scholarship_id: request.scholarship_id,
                scholarship_name: request.scholarship_name,
                university_name: request.university_name,
            },
            success_url: format!(
                "{}/payment-success?session_id={SESSION_ID_PLACEHOLDER}",
                self.site_origin
            ),
            cancel_url: format!(
                "{}/payment-failure?session_id={SESSION_ID_PLACEHOLDER}",
                self.site_origin
            ),
        };

        tracing::debug!(
            gateway = self.gateway.name(),
            amount_minor,
            "creating checkout session"
        );

        timeout(PROVIDER_TIMEOUT, self.gateway.create_session(spec))
            .await
            .map_err(|_| PaymentError::Provider("checkout session creation timed out".into()))?
    }

    /// Read the outcome of a session, live from the provider.
    ///
    /// Amount and metadata were fixed at creation; this only surfaces what
    /// the provider stored. Unknown ids fail with
    /// [`PaymentError::SessionNotFound`](crate::PaymentError::SessionNotFound),
    /// never a zero-filled outcome.
    pub async fn retrieve_outcome(
        &self,
        session_id: &str,
        kind: OutcomeKind,
    ) -> Result<NormalizedOutcome> {
        let record = timeout(PROVIDER_TIMEOUT, self.gateway.retrieve_session(session_id))
            .await
            .map_err(|_| PaymentError::Provider("session retrieval timed out".into()))??;
        Ok(NormalizedOutcome::from_record(record, kind))
    }
}
