//! billing-service: order persistence and payment reconciliation
//!
//! Orders are stored in PostgreSQL, validated on the way in and, when listed
//! for a user, joined with their PayPal checkout records.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod paypal;
pub mod provisioning;
pub mod reconcile;
pub mod service;
pub mod state;
pub mod validation;
