//! scholar-stream HTTP Server
//!
//! Axum-based server for the scholarship-discovery platform's payment flow:
//! creates hosted checkout sessions for application fees and reconciles
//! session outcomes after the provider redirects the applicant back.

mod auth;
mod config;
mod error;
mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scholar_payments::{CheckoutManager, StripeGateway};

use crate::auth::HttpTokenVerifier;
use crate::config::Config;
use crate::state::AppState;

/// Upper bound on any outbound call; a hung provider becomes an error
/// instead of a stuck request.
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Payment gateway
    let gateway = Arc::new(StripeGateway::new(&config.stripe_secret_key));
    let checkout = Arc::new(CheckoutManager::new(gateway, config.site_origin.clone()));
    tracing::info!("✓ Stripe configured, redirects to {}", config.site_origin);

    // Identity verifier
    let http = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()?;
    let verifier = Arc::new(HttpTokenVerifier::new(http, config.auth_verify_url.clone()));
    tracing::info!("✓ Token verifier at {}", config.auth_verify_url);

    let state = AppState { checkout, verifier };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("🚀 scholar-server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                        - Health check");
    tracing::info!("  POST /create-payment-session        - Create checkout session (auth)");
    tracing::info!("  GET  /payment-success/{{session_id}}  - Success outcome");
    tracing::info!("  GET  /payment-failure/{{session_id}}  - Failure outcome");

    axum::serve(listener, app).await?;

    Ok(())
}
