//! Unified error codes for the billing platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment provider errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// One or more fields failed validation
    ValidationFailed = 2,
    /// Invalid request (malformed body, bad path parameter)
    InvalidRequest = 5,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order to delete could not be confirmed
    OrderDeleteUnconfirmed = 4002,

    // ==================== 5xxx: Payment provider ====================
    /// Credential exchange with the payment provider failed
    ProviderAuthFailed = 5001,
    /// Payment provider could not be reached
    ProviderUnavailable = 5002,
    /// Reconciled listing lost or gained records
    ReconciliationMismatch = 5003,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Provisioning orchestrator could not be notified
    OrchestratorUnavailable = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => {
                "One or more parameters do not match the required format"
            }
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderDeleteUnconfirmed => "Unexpected order to delete",

            ErrorCode::ProviderAuthFailed => "Could not get payment provider access token",
            ErrorCode::ProviderUnavailable => "Could not retrieve payment provider order details",
            ErrorCode::ReconciliationMismatch => "Reconciled order count does not match",

            ErrorCode::DatabaseError => "Database error",
            ErrorCode::OrchestratorUnavailable => "Could not contact provisioning service",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Raised when a numeric value does not name a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderDeleteUnconfirmed),

            5001 => Ok(ErrorCode::ProviderAuthFailed),
            5002 => Ok(ErrorCode::ProviderUnavailable),
            5003 => Ok(ErrorCode::ReconciliationMismatch),

            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::OrchestratorUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
