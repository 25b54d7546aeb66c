//! Server Configuration

use anyhow::Context;

/// Environment-driven configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub bind_addr: String,

    /// Origin the payment provider redirects back to after checkout
    pub site_origin: String,

    /// Stripe API secret
    pub stripe_secret_key: String,

    /// Identity service endpoint that verifies bearer tokens
    pub auth_verify_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            site_origin: std::env::var("SITE_ORIGIN").context("SITE_ORIGIN not set")?,
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY")
                .context("STRIPE_SECRET_KEY not set")?,
            auth_verify_url: std::env::var("AUTH_VERIFY_URL")
                .context("AUTH_VERIFY_URL not set")?,
        })
    }
}
