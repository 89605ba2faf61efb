//! Order endpoints: CRUD plus the (optionally reconciled) listing

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::Order;
use shared::error::AppError;

use crate::service::Listing;
use crate::state::AppState;
use crate::validation::OrderForm;

use super::ApiResult;

/// Query string of `/orders`; kept as text so garbage reads as 0
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub count: Option<String>,
    pub start: Option<String>,
}

/// Optional body of `/orders`
#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    #[serde(default)]
    pub user_id: Option<String>,
}

fn number_or_zero(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Ids are unsigned decimal digits only
fn parse_id(raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_request("Invalid order ID"));
    }
    raw.parse()
        .map_err(|_| AppError::invalid_request("Invalid order ID"))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request payload");
        AppError::invalid_request("Invalid request payload")
    })
}

fn parse_filter(body: &[u8]) -> Result<ListFilter, AppError> {
    if body.trim_ascii().is_empty() {
        return Ok(ListFilter::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected listing filter");
        AppError::invalid_request("Could not decode user id in request body")
    })
}

/// GET|POST /orders?count=&start=
///
/// An empty body means no filter; any other body must decode.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    body: Bytes,
) -> ApiResult<Listing> {
    let filter = parse_filter(&body)?;

    let listing = state
        .orders
        .list(
            number_or_zero(query.start.as_deref()),
            number_or_zero(query.count.as_deref()),
            filter.user_id.as_deref(),
        )
        .await?;

    tracing::debug!(returned = listing.len(), "Listed orders");
    Ok(Json(listing))
}

/// POST /order
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let form: OrderForm = parse_body(&body)?;
    let order = state.orders.create(form).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /order/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Order> {
    let id = parse_id(&id)?;
    Ok(Json(state.orders.get(id).await?))
}

/// PUT /order/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Order> {
    let id = parse_id(&id)?;
    let form: OrderForm = parse_body(&body)?;
    Ok(Json(state.orders.update(id, form).await?))
}

/// DELETE /order/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let id = parse_id(&id)?;
    state.orders.delete(id).await?;
    Ok(Json(serde_json::json!({ "result": "success" })))
}
