//! Payment Gateway Integration
//!
//! Abstraction and implementations for the external checkout provider.

mod mock;
mod stripe;

pub use self::mock::MockGateway;
pub use self::stripe::StripeGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Payment gateway trait (Strategy pattern)
///
/// The provider owns every checkout session: the service creates one, hands
/// the applicant the redirect URL, and later reads the session state back.
/// Nothing is cached locally between the two calls.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session
    async fn create_session(&self, spec: SessionSpec) -> Result<CreatedSession>;

    /// Retrieve a session by its provider-assigned id
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionRecord>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// Everything the provider needs to create one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSpec {
    /// Display name on the hosted checkout page
    pub product_name: String,

    /// Charge amount in minor currency units (USD cents)
    pub amount_minor: i64,

    /// Payer email, pre-filled on the checkout page
    pub customer_email: String,

    /// Identifiers threaded through the session, immutable after creation
    pub metadata: SessionMetadata,

    /// Redirect target after a completed payment
    pub success_url: String,

    /// Redirect target after an abandoned or failed payment
    pub cancel_url: String,
}

/// Scholarship identifiers attached to a session at creation.
///
/// Opaque to the payment core: nothing here is validated for existence,
/// only stored with the session and surfaced on retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub scholarship_id: String,
    pub scholarship_name: String,
    pub university_name: String,
}

/// Reference to a freshly created session.
///
/// The redirect URL exists only at creation time; it cannot be read back
/// from the provider later.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedSession {
    pub id: String,
    pub redirect_url: String,
}

/// Provider-side session state as read at retrieval time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,

    /// Amount in minor currency units, fixed at creation
    pub amount_total: i64,

    pub customer_email: String,

    pub metadata: SessionMetadata,

    /// Written only by the provider as the payer completes or abandons
    /// checkout; this crate never mutates it.
    pub payment_status: PaymentStatus,
}

/// Provider payment status of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
}
