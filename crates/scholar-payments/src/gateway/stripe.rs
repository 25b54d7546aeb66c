//! Stripe Checkout Gateway
//!
//! Implements [`PaymentGateway`] against Stripe's hosted Checkout API.

use std::collections::HashMap;

use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionPaymentMethodTypes,
    Currency, StripeError,
};

use async_trait::async_trait;

use super::{CreatedSession, PaymentGateway, PaymentStatus, SessionMetadata, SessionRecord, SessionSpec};
use crate::error::{PaymentError, Result};

const METADATA_SCHOLARSHIP_ID: &str = "scholarshipId";
const METADATA_SCHOLARSHIP_NAME: &str = "scholarshipName";
const METADATA_UNIVERSITY_NAME: &str = "universityName";

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(&secret_key))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(&self, spec: SessionSpec) -> Result<CreatedSession> {
        let mut metadata = HashMap::new();
        metadata.insert(
            METADATA_SCHOLARSHIP_ID.to_string(),
            spec.metadata.scholarship_id.clone(),
        );
        metadata.insert(
            METADATA_SCHOLARSHIP_NAME.to_string(),
            spec.metadata.scholarship_name.clone(),
        );
        metadata.insert(
            METADATA_UNIVERSITY_NAME.to_string(),
            spec.metadata.university_name.clone(),
        );

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.customer_email = Some(&spec.customer_email);
        params.success_url = Some(&spec.success_url);
        params.cancel_url = Some(&spec.cancel_url);
        params.metadata = Some(metadata);

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(spec.amount_minor),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: spec.product_name.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        let redirect_url = session
            .url
            .ok_or_else(|| PaymentError::Provider("no checkout URL returned".into()))?;

        Ok(CreatedSession {
            id: session.id.to_string(),
            redirect_url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionRecord> {
        // An id Stripe cannot even parse is indistinguishable from an
        // unknown one from the caller's point of view.
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| PaymentError::SessionNotFound(session_id.to_string()))?;

        let session = CheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| match e {
                StripeError::Stripe(ref err) if err.http_status == 404 => {
                    PaymentError::SessionNotFound(session_id.to_string())
                }
                other => PaymentError::Provider(other.to_string()),
            })?;

        let metadata = session.metadata.unwrap_or_default();

        Ok(SessionRecord {
            id: session.id.to_string(),
            amount_total: session.amount_total.unwrap_or_default(),
            customer_email: session.customer_email.unwrap_or_default(),
            metadata: SessionMetadata {
                scholarship_id: metadata
                    .get(METADATA_SCHOLARSHIP_ID)
                    .cloned()
                    .unwrap_or_default(),
                scholarship_name: metadata
                    .get(METADATA_SCHOLARSHIP_NAME)
                    .cloned()
                    .unwrap_or_default(),
                university_name: metadata
                    .get(METADATA_UNIVERSITY_NAME)
                    .cloned()
                    .unwrap_or_default(),
            },
            payment_status: match session.payment_status {
                CheckoutSessionPaymentStatus::Paid => PaymentStatus::Paid,
                CheckoutSessionPaymentStatus::Unpaid => PaymentStatus::Unpaid,
                CheckoutSessionPaymentStatus::NoPaymentRequired => {
                    PaymentStatus::NoPaymentRequired
                }
            },
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}
