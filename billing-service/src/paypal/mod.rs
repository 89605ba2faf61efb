//! Payment provider access
//!
//! [`PaymentProvider`] is what reconciliation needs from the provider: one
//! credential exchange, then one lookup per correlation id. [`PaypalClient`]
//! implements it against the PayPal REST API.

mod client;

pub use client::PaypalClient;

use async_trait::async_trait;
use shared::ProviderOrderDetail;
use thiserror::Error;

/// Errors from the payment provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential exchange was refused or unusable.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request did not complete or the answer could not be read.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

/// Short-lived bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Result of looking up one correlation id
#[derive(Debug)]
pub enum FetchOutcome {
    /// The provider knows this order.
    Found(ProviderOrderDetail),
    /// The provider answered with a non-200 status; no detail for this id.
    Miss { status: u16 },
    /// The lookup itself failed.
    TransportFailure(ProviderError),
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn authenticate(&self) -> Result<AccessToken, ProviderError>;

    async fn fetch_detail(&self, token: &AccessToken, correlation_id: &str) -> FetchOutcome;
}
