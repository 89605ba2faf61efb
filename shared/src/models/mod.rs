//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Order IDs are `i64` (Postgres BIGSERIAL).

pub mod order;
pub mod provider;

// Re-exports
pub use order::*;
pub use provider::*;
