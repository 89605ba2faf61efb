//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::OrderNotFound => StatusCode::NOT_FOUND,

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::OrderDeleteUnconfirmed
            | Self::ProviderAuthFailed
            | Self::ProviderUnavailable
            | Self::ReconciliationMismatch
            | Self::DatabaseError
            | Self::OrchestratorUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
