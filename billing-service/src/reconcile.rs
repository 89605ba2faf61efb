//! Order reconciliation
//!
//! Joins a page of local orders with the payment provider's view of them:
//!
//! 1. collect distinct correlation ids, in page order
//! 2. authenticate once (failure aborts everything)
//! 3. look up each id; misses leave holes, transport failures follow [`TransportPolicy`]
//! 4. join by id, one [`EnrichedOrder`] per input order, input order preserved
//! 5. refuse to answer if the join produced a different number of entries

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use futures::StreamExt;
use shared::{EnrichedOrder, Order, ProviderOrderDetail};
use thiserror::Error;

use crate::paypal::{FetchOutcome, PaymentProvider, ProviderError};

/// What a transport failure on one lookup does to the rest of the batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportPolicy {
    /// Stop and fail the whole reconciliation.
    #[default]
    Abort,
    /// Log it and treat the id as a miss.
    Skip,
}

impl FromStr for TransportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!(
                "unknown provider transport failure policy '{other}' (expected abort or skip)"
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("payment provider authentication failed: {0}")]
    Auth(#[source] ProviderError),

    #[error("lookup of provider order {correlation_id} failed: {source}")]
    Transport {
        correlation_id: String,
        #[source]
        source: ProviderError,
    },

    #[error("reconciled {actual} orders from a page of {expected}")]
    Parity { expected: usize, actual: usize },
}

/// Per-call counters, logged once per reconciliation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub candidates: usize,
    pub found: usize,
    pub missed: usize,
    pub skipped_failures: usize,
}

pub struct Reconciler {
    provider: Arc<dyn PaymentProvider>,
    concurrency: usize,
    policy: TransportPolicy,
}

impl Reconciler {
    /// `concurrency` bounds in-flight lookups; 1 means strictly sequential.
    pub fn new(provider: Arc<dyn PaymentProvider>, concurrency: usize, policy: TransportPolicy) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
            policy,
        }
    }

    /// Enrich `orders` with provider details
    pub async fn reconcile(&self, orders: Vec<Order>) -> Result<Vec<EnrichedOrder>, ReconcileError> {
        let ids = correlation_ids(&orders);

        let token = self.provider.authenticate().await.map_err(|e| {
            tracing::error!(error = %e, "Could not get payment provider access token");
            ReconcileError::Auth(e)
        })?;

        let mut stats = ReconcileStats {
            candidates: ids.len(),
            ..Default::default()
        };
        let mut resolved: Vec<ProviderOrderDetail> = Vec::with_capacity(ids.len());

        let mut lookups = futures::stream::iter(ids)
            .map(|id| {
                let provider = Arc::clone(&self.provider);
                let token = token.clone();
                async move {
                    let outcome = provider.fetch_detail(&token, &id).await;
                    (id, outcome)
                }
            })
            .buffered(self.concurrency);

        while let Some((id, outcome)) = lookups.next().await {
            match outcome {
                FetchOutcome::Found(detail) => {
                    stats.found += 1;
                    resolved.push(detail);
                }
                FetchOutcome::Miss { status } => {
                    tracing::debug!(correlation_id = %id, status, "No provider detail");
                    stats.missed += 1;
                }
                FetchOutcome::TransportFailure(source) => match self.policy {
                    TransportPolicy::Abort => {
                        return Err(ReconcileError::Transport {
                            correlation_id: id,
                            source,
                        });
                    }
                    TransportPolicy::Skip => {
                        tracing::warn!(
                            correlation_id = %id,
                            error = %source,
                            "Provider lookup failed, continuing without detail"
                        );
                        stats.skipped_failures += 1;
                    }
                },
            }
        }

        let expected = orders.len();
        let enriched = join(orders, resolved);
        ensure_parity(expected, enriched.len())?;

        tracing::info!(
            orders = expected,
            candidates = stats.candidates,
            found = stats.found,
            missed = stats.missed,
            skipped_failures = stats.skipped_failures,
            "Reconciled orders with payment provider"
        );
        Ok(enriched)
    }
}

/// Distinct non-blank correlation ids, first occurrence order
pub fn correlation_ids(orders: &[Order]) -> Vec<String> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .filter_map(Order::join_key)
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}

/// Pair every order with the detail whose `id` equals its correlation id
///
/// Output has one entry per order, in input order.
pub fn join(orders: Vec<Order>, details: Vec<ProviderOrderDetail>) -> Vec<EnrichedOrder> {
    let mut by_id: HashMap<String, ProviderOrderDetail> = HashMap::with_capacity(details.len());
    for detail in details {
        by_id.insert(detail.id.clone(), detail);
    }

    orders
        .into_iter()
        .map(|order| {
            let detail = order.join_key().and_then(|key| by_id.get(key)).cloned();
            EnrichedOrder { order, detail }
        })
        .collect()
}

pub fn ensure_parity(expected: usize, actual: usize) -> Result<(), ReconcileError> {
    if expected != actual {
        tracing::error!(expected, actual, "Reconciliation parity check failed");
        return Err(ReconcileError::Parity { expected, actual });
    }
    Ok(())
}
