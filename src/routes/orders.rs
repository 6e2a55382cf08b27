//! Order management routes

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiJson, ApiQuery, DataResponse, ListResponse, MessageResponse};
use crate::app::AppState;
use crate::domain::orders::{
    self, ClientActivity, OrderQuery, OrderRecord, OrderStatus, StatusChange,
};
use crate::domain::Confirmation;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    /// Answer to the cancel prompt; absent until the user has answered
    #[serde(default)]
    pub confirmed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityUpdateRequest {
    pub activity: ClientActivity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityUpdateResponse {
    pub client_activity: ClientActivity,
    pub label: &'static str,
    pub last_activity_update: String,
}

fn order_not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Order {id} not found"))
}

/// GET /orders
///
/// Search, filter by status and sort by inserted date.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let all = state.records.orders().await;
    let data: Vec<OrderRecord> = orders::filter_orders(&all, &query)
        .into_iter()
        .cloned()
        .collect();

    Ok(ListResponse::new(data, all.len()))
}

/// PATCH /orders/:id/status
///
/// Cancelling removes the order and needs `confirmed: true`.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = Confirmation::from_answer(req.confirmed);

    let _guard = state.records.write_lock().await;
    let mut all = state.records.orders_for_update().await?;

    let change = orders::change_status(&mut all, &id, req.status, confirmation);
    if change.requires_save() {
        state.records.save_orders(&all).await?;
    }

    tracing::info!(order = %id, status = %req.status, outcome = ?change, "Order status change");

    match change {
        StatusChange::Updated => Ok(MessageResponse::new(format!(
            "Order status updated to {}",
            req.status
        ))),
        StatusChange::Removed => Ok(MessageResponse::new("Order canceled and removed")),
        StatusChange::Declined => Ok(MessageResponse::with_code(
            "Cancellation declined, order kept",
            "DECLINED",
        )),
        StatusChange::AwaitingConfirmation => Err(ApiError::Conflict(
            "Are you sure you want to cancel this order? Confirm to remove it".to_string(),
        )),
        StatusChange::NotFound => Err(order_not_found(&id)),
    }
}

/// PATCH /orders/:id/activity
pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ActivityUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _guard = state.records.write_lock().await;
    let mut all = state.records.orders_for_update().await?;

    if !orders::set_activity(&mut all, &id, req.activity, Local::now().naive_local()) {
        return Err(order_not_found(&id));
    }
    state.records.save_orders(&all).await?;

    let updated = all
        .iter()
        .find(|order| order.id == id)
        .ok_or_else(|| order_not_found(&id))?;

    Ok(DataResponse::new(ActivityUpdateResponse {
        client_activity: updated.client_activity,
        label: updated.client_activity.label(),
        last_activity_update: updated.last_activity_update.clone(),
    }))
}
