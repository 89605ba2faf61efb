//! Shared types for the billing platform
//!
//! Order models and the unified error system used by the billing service
//! and anything that talks to it.

pub mod error;
pub mod models;

// Re-exports
pub use http;

pub use error::{AppError, ErrorCode};
pub use models::{EnrichedOrder, Order, ProviderOrderDetail};
