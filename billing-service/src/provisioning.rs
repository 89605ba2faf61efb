//! Provisioning orchestrator notification
//!
//! Fire-and-forget: the created order is POSTed as JSON and the response body
//! is ignored. Only a failed request counts as a failure.

use async_trait::async_trait;
use shared::Order;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("could not contact provisioning service: {0}")]
pub struct OrchestratorError(pub String);

#[async_trait]
pub trait Orchestrator: Send + Sync {
    async fn order_created(&self, order: &Order) -> Result<(), OrchestratorError>;
}

/// Notifies the "sys service" over HTTP
#[derive(Clone)]
pub struct SysServiceNotifier {
    http: reqwest::Client,
    url: String,
}

impl SysServiceNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Orchestrator for SysServiceNotifier {
    async fn order_created(&self, order: &Order) -> Result<(), OrchestratorError> {
        tracing::info!(
            order_id = order.id,
            user_id = %order.user_id,
            "Contacting provisioning service"
        );

        let resp = self
            .http
            .post(&self.url)
            .json(order)
            .send()
            .await
            .map_err(|e| OrchestratorError(e.to_string()))?;

        if !resp.status().is_success() {
            tracing::warn!(
                order_id = order.id,
                status = %resp.status(),
                "Provisioning service answered with a non-success status"
            );
        }
        Ok(())
    }
}
