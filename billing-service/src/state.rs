//! Application state for billing-service

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::db::{OrderStore, PgOrderStore};
use crate::paypal::{PaymentProvider, PaypalClient};
use crate::provisioning::{Orchestrator, SysServiceNotifier};
use crate::reconcile::Reconciler;
use crate::service::OrderService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
}

impl AppState {
    /// Wire the production collaborators from `config`
    ///
    /// Returns the pool alongside so the caller can close it on shutdown.
    pub async fn new(config: &Config) -> Result<(Self, sqlx::PgPool), BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;
        tracing::info!("Opened PostgreSQL connection pool");

        sqlx::migrate!("./migrations").run(&pool).await?;

        let provider = PaypalClient::new(
            &config.paypal_api_base,
            &config.paypal_client_id,
            &config.paypal_client_secret,
        )?;

        let state = Self::from_parts(
            Arc::new(PgOrderStore::new(pool.clone())),
            Arc::new(provider),
            Arc::new(SysServiceNotifier::new(&config.sys_service_url)),
            config,
        );
        Ok((state, pool))
    }

    /// Build state around arbitrary collaborators
    pub fn from_parts(
        store: Arc<dyn OrderStore>,
        provider: Arc<dyn PaymentProvider>,
        orchestrator: Arc<dyn Orchestrator>,
        config: &Config,
    ) -> Self {
        let reconciler = Reconciler::new(
            provider,
            config.provider_fetch_concurrency,
            config.provider_transport_failure,
        );
        Self {
            orders: Arc::new(OrderService::new(store, reconciler, orchestrator)),
        }
    }
}
