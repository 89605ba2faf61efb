//! Unified error system for the billing platform
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code, message and optional details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment provider errors
//! - 9xxx: System errors
//!
//! # Wire format
//!
//! Every error leaves the HTTP boundary as `{"error": "<message>"}`; the
//! HTTP status carries the kind.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderNotFound);
//! assert_eq!(err.http_status(), shared::http::StatusCode::NOT_FOUND);
//!
//! let err = AppError::validation("cluster_name has an invalid format")
//!     .with_detail("fields", vec!["cluster_name"]);
//! assert_eq!(err.http_status(), shared::http::StatusCode::BAD_REQUEST);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorBody};
