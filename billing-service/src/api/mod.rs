//! API routes for billing-service

pub mod health;
pub mod orders;

use axum::Router;
use axum::routing::{get, post};
use shared::error::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Handler result type
pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/orders", get(orders::list).post(orders::list))
        .route("/order", post(orders::create))
        .route(
            "/order/{id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
