//! Service-layer error type
//!
//! `ServiceError` bridges domain errors (store, validation, provider,
//! orchestrator) and the API-layer `AppError`, so handlers can use `?`
//! without mapping by hand.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;
use crate::provisioning::OrchestratorError;
use crate::reconcile::ReconcileError;
use crate::validation::ValidationFailure;

#[derive(Debug)]
pub enum ServiceError {
    /// Input broke one or more field rules
    Validation(ValidationFailure),
    /// Order store failure (not found or database)
    Store(StoreError),
    /// Provider reconciliation failure
    Reconcile(ReconcileError),
    /// Order persisted, orchestrator not reached
    Orchestrator(OrchestratorError),
    /// Already an AppError with the right ErrorCode
    App(AppError),
}

impl From<ValidationFailure> for ServiceError {
    fn from(e: ValidationFailure) -> Self {
        ServiceError::Validation(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<ReconcileError> for ServiceError {
    fn from(e: ReconcileError) -> Self {
        ServiceError::Reconcile(e)
    }
}

impl From<OrchestratorError> for ServiceError {
    fn from(e: OrchestratorError) -> Self {
        ServiceError::Orchestrator(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(failure) => {
                let fields = failure.fields.clone();
                AppError::validation(failure.to_string()).with_detail("fields", fields)
            }
            ServiceError::Store(StoreError::NotFound(id)) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            ServiceError::Store(StoreError::Database(db_err)) => {
                tracing::error!(error = %db_err, "Order store error");
                AppError::new(ErrorCode::DatabaseError)
            }
            ServiceError::Reconcile(err) => {
                let code = match &err {
                    ReconcileError::Auth(_) => ErrorCode::ProviderAuthFailed,
                    ReconcileError::Transport { .. } => ErrorCode::ProviderUnavailable,
                    ReconcileError::Parity { .. } => ErrorCode::ReconciliationMismatch,
                };
                AppError::new(code).with_detail("cause", err.to_string())
            }
            ServiceError::Orchestrator(err) => {
                AppError::new(ErrorCode::OrchestratorUnavailable).with_detail("cause", err.0)
            }
            ServiceError::App(app_err) => app_err,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paypal::ProviderError;
    use http::StatusCode;

    fn status_of(e: impl Into<ServiceError>) -> StatusCode {
        AppError::from(e.into()).http_status()
    }

    #[test]
    fn test_client_errors() {
        let failure = ValidationFailure {
            fields: vec!["cluster_name".into()],
        };
        assert_eq!(status_of(failure), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(StoreError::NotFound(4)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(
            status_of(StoreError::Database(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ReconcileError::Auth(ProviderError::Auth("denied".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ReconcileError::Parity {
                expected: 2,
                actual: 1
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(OrchestratorError("connection refused".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_reconcile_error_codes() {
        let err: AppError = ServiceError::from(ReconcileError::Transport {
            correlation_id: "A".into(),
            source: ProviderError::Transport("reset".into()),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ProviderUnavailable);
        assert_eq!(err.message, "Could not retrieve payment provider order details");
    }

    #[test]
    fn test_validation_message_names_fields() {
        let err: AppError = ServiceError::from(ValidationFailure {
            fields: vec!["cluster_name".into(), "user_id".into()],
        })
        .into();
        assert!(err.message.contains("cluster_name, user_id"));
    }
}
