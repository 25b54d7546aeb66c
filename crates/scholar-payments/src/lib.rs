//! # scholar-payments
//!
//! Payment-session lifecycle for the scholar-stream platform.
//!
//! Application fees are collected through Stripe's hosted Checkout: the
//! server creates a session from an application's fee composition, redirects
//! the applicant to Stripe, and reads the session back once Stripe redirects
//! them to the success or failure page.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │  Applicant  │────▶│  Stripe Hosted  │────▶│  /payment-success │
//! │  (apply)    │     │  Checkout Page  │     │  /payment-failure │
//! └─────────────┘     └─────────────────┘     └──────────────────┘
//! ```
//!
//! The session is owned entirely by Stripe between creation and retrieval;
//! this crate holds no local copy and tracks no state machine. Outcome is
//! always a live read of the provider session.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scholar_payments::{CheckoutManager, PaymentRequest, StripeGateway};
//!
//! let gateway = Arc::new(StripeGateway::new("sk_test_xxx"));
//! let checkout = CheckoutManager::new(gateway, "https://scholarstream.app");
//!
//! let session = checkout.create(request).await?;
//! // Redirect applicant to: session.redirect_url
//! ```

mod checkout;
mod error;
mod fees;
pub mod gateway;

pub use checkout::{
    CheckoutManager, NormalizedOutcome, OutcomeKind, PaymentRequest, SESSION_ID_PLACEHOLDER,
};
pub use error::{PaymentError, Result};
pub use fees::FeeBreakdown;
pub use gateway::{
    CreatedSession, MockGateway, PaymentGateway, PaymentStatus, SessionMetadata, SessionRecord,
    SessionSpec, StripeGateway,
};
