//! Billing service configuration

use std::str::FromStr;

use crate::reconcile::TransportPolicy;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_PAYPAL_API_BASE: &str = "https://api-m.sandbox.paypal.com";

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Connection pool size
    pub db_max_connections: u32,
    /// Provisioning orchestrator ("sys service") endpoint, notified on create
    pub sys_service_url: String,
    /// PayPal REST client id
    pub paypal_client_id: String,
    /// PayPal REST client secret
    pub paypal_client_secret: String,
    /// PayPal API base URL (sandbox by default)
    pub paypal_api_base: String,
    /// Max in-flight provider lookups per listing (1 = sequential)
    pub provider_fetch_concurrency: usize,
    /// What a transport failure on one lookup does to the rest of the batch
    pub provider_transport_failure: TransportPolicy,
    /// Emit JSON logs instead of the human-readable format
    pub log_json: bool,
    /// Directory for rotating log files, if any
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var (the PayPal client id and secret)
    ///
    /// Outside `development` it must be set and non-empty; in development a
    /// placeholder is substituted so the service starts without sandbox credentials.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// `DATABASE_URL`, or one assembled from the `DB_*` parts
    fn database_url() -> Result<String, BoxError> {
        if let Ok(url) = std::env::var("DATABASE_URL")
            && !url.is_empty()
        {
            return Ok(url);
        }

        let host = std::env::var("DB_HOST").map_err(|_| "DATABASE_URL or DB_HOST must be set")?;
        let user = std::env::var("DB_USER").map_err(|_| "DB_USER must be set")?;
        let password = std::env::var("DB_PASSWORD").unwrap_or_default();
        let name = std::env::var("DB_NAME").map_err(|_| "DB_NAME must be set")?;

        Ok(format!(
            "postgres://{user}:{password}@{host}:5432/{name}?sslmode=disable"
        ))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let provider_transport_failure = match std::env::var("PROVIDER_TRANSPORT_FAILURE") {
            Ok(v) => TransportPolicy::from_str(&v)?,
            Err(_) => TransportPolicy::default(),
        };

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8010),
            database_url: Self::database_url()?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(5),
            sys_service_url: std::env::var("SYS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8020/sys-service/".into()),
            paypal_client_id: Self::require_secret("PAYPAL_CLIENT_ID", &environment)?,
            paypal_client_secret: Self::require_secret("PAYPAL_CLIENT_SECRET", &environment)?,
            paypal_api_base: std::env::var("PAYPAL_API_BASE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_PAYPAL_API_BASE.into()),
            provider_fetch_concurrency: std::env::var("PROVIDER_FETCH_CONCURRENCY")
                .ok()
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, 10),
            provider_transport_failure,
            log_json: std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }
}
