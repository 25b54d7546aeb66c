//! Application State

use std::sync::Arc;

use scholar_payments::CheckoutManager;

use crate::auth::TokenVerifier;

/// Shared application state
///
/// Handles only; nothing here is mutated between requests, so concurrent
/// checkouts never contend on shared state.
#[derive(Clone)]
pub struct AppState {
    /// Checkout lifecycle over the configured payment gateway
    pub checkout: Arc<CheckoutManager>,

    /// Bearer-token verification capability
    pub verifier: Arc<dyn TokenVerifier>,
}
