//! Shared fixtures for the router tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use billing_service::api;
use billing_service::config::Config;
use billing_service::db::{MemoryOrderStore, OrderStore};
use billing_service::paypal::{AccessToken, FetchOutcome, PaymentProvider, ProviderError};
use billing_service::provisioning::{Orchestrator, OrchestratorError};
use billing_service::reconcile::TransportPolicy;
use billing_service::state::AppState;
use serde_json::Value;
use shared::{Order, ProviderOrderDetail};
use tower::ServiceExt;

pub const USER: &str = "12345678-abcd-ef01-2345-6789abcdef01";
pub const OTHER_USER: &str = "87654321-abcd-ef01-2345-6789abcdef01";

pub fn test_config() -> Config {
    Config {
        environment: "development".into(),
        http_port: 0,
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        sys_service_url: "http://127.0.0.1:1/unused".into(),
        paypal_client_id: "id".into(),
        paypal_client_secret: "secret".into(),
        paypal_api_base: "http://127.0.0.1:1".into(),
        provider_fetch_concurrency: 1,
        provider_transport_failure: TransportPolicy::Abort,
        log_json: false,
        log_dir: None,
    }
}

/// Provider double: ids in `found` resolve, ids in `unreachable` fail at the
/// transport level, anything else is a 404
#[derive(Default)]
pub struct FakeProvider {
    pub found: HashMap<String, String>,
    pub unreachable: HashSet<String>,
    pub auth_fails: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_found(ids: &[(&str, &str)]) -> Self {
        Self {
            found: ids
                .iter()
                .map(|(id, status)| (id.to_string(), status.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn unreachable_for(mut self, ids: &[&str]) -> Self {
        self.unreachable = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn authenticate(&self) -> Result<AccessToken, ProviderError> {
        if self.auth_fails {
            return Err(ProviderError::Auth("invalid_client".into()));
        }
        Ok(AccessToken::new("fake-token"))
    }

    async fn fetch_detail(&self, _token: &AccessToken, correlation_id: &str) -> FetchOutcome {
        self.calls.lock().unwrap().push(correlation_id.to_string());
        if self.unreachable.contains(correlation_id) {
            return FetchOutcome::TransportFailure(ProviderError::Transport("connection reset".into()));
        }
        match self.found.get(correlation_id) {
            Some(status) => {
                let mut detail = ProviderOrderDetail::new(correlation_id);
                detail.status = Some(status.clone());
                FetchOutcome::Found(detail)
            }
            None => FetchOutcome::Miss { status: 404 },
        }
    }
}

/// Orchestrator double recording every notified order id
#[derive(Default)]
pub struct RecordingOrchestrator {
    pub fail: bool,
    pub notified: Mutex<Vec<i64>>,
}

impl RecordingOrchestrator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn notified(&self) -> Vec<i64> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait]
impl Orchestrator for RecordingOrchestrator {
    async fn order_created(&self, order: &Order) -> Result<(), OrchestratorError> {
        if self.fail {
            return Err(OrchestratorError("connection refused".into()));
        }
        self.notified.lock().unwrap().push(order.id);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryOrderStore>,
    pub provider: Arc<FakeProvider>,
    pub orchestrator: Arc<RecordingOrchestrator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(FakeProvider::default(), RecordingOrchestrator::default())
    }

    pub fn with(provider: FakeProvider, orchestrator: RecordingOrchestrator) -> Self {
        Self::with_config(provider, orchestrator, test_config())
    }

    pub fn with_config(
        provider: FakeProvider,
        orchestrator: RecordingOrchestrator,
        config: Config,
    ) -> Self {
        let store = Arc::new(MemoryOrderStore::new());
        let provider = Arc::new(provider);
        let orchestrator = Arc::new(orchestrator);
        let state = AppState::from_parts(
            store.clone(),
            provider.clone(),
            orchestrator.clone(),
            &config,
        );
        Self {
            router: api::create_router(state),
            store,
            provider,
            orchestrator,
        }
    }

    /// Insert straight into the store, bypassing validation and notification
    pub async fn seed(&self, user_id: &str, cluster_name: &str, paypal_id: Option<&str>) -> Order {
        self.store
            .create(Order {
                id: 0,
                user_id: user_id.into(),
                cluster_name: cluster_name.into(),
                has_control_plane: true,
                monitoring_storage: 10,
                image_storage: 20,
                alerting: false,
                correlation_id: paypal_id.map(String::from),
            })
            .await
            .unwrap()
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_raw(&self, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

pub fn valid_order_json() -> Value {
    serde_json::json!({
        "user_id": USER,
        "cluster_name": "prod-cluster-1",
        "has_control_plane": true,
        "monitoring_storage": 50,
        "image_storage": 100,
        "alerting": true,
        "paypal_id": "5O190127TN364715T"
    })
}
