//! Notification recipient routes

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{ApiJson, ApiQuery, Created, DataResponse, ListResponse, MessageResponse};
use crate::app::AppState;
use crate::domain::employees::{self, EmployeeRecord, NewEmployee, Removal};
use crate::domain::Confirmation;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct EmployeeQueryParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveEmployeesRequest {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub id: String,
    pub is_active: bool,
}

/// GET /employees
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<EmployeeQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let all = state.records.employees().await;
    let data: Vec<EmployeeRecord> = employees::filter_employees(&all, &params.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(ListResponse::new(data, all.len()))
}

/// POST /employees
pub async fn add_employee(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NewEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    let record = req.into_record(Uuid::new_v4().to_string())?;

    let _guard = state.records.write_lock().await;
    let mut all = state.records.employees_for_update().await?;
    all.push(record.clone());
    state.records.save_employees(&all).await?;

    tracing::info!(employee = %record.id, role = %record.role, "Recipient added");
    Ok(Created(record))
}

/// POST /employees/:id/toggle
pub async fn toggle_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let _guard = state.records.write_lock().await;
    let mut all = state.records.employees_for_update().await?;

    let is_active = employees::toggle_active(&mut all, &id)
        .ok_or_else(|| ApiError::not_found(format!("Employee {id} not found")))?;
    state.records.save_employees(&all).await?;

    Ok(DataResponse::new(ToggleResponse { id, is_active }))
}

/// DELETE /employees
///
/// Remove the selected recipients once `confirmed: true` is sent.
pub async fn remove_employees(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RemoveEmployeesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = Confirmation::from_answer(req.confirmed);

    let _guard = state.records.write_lock().await;
    let mut all = state.records.employees_for_update().await?;

    match employees::remove_selected(&mut all, &req.ids, confirmation) {
        Removal::Removed(count) => {
            state.records.save_employees(&all).await?;
            tracing::info!(count, "Recipients removed");
            Ok(MessageResponse::new(format!("Removed {count} employee(s)")))
        }
        Removal::Declined => Ok(MessageResponse::with_code(
            "Removal declined, nothing changed",
            "DECLINED",
        )),
        Removal::NothingSelected => Err(ApiError::bad_request("No employees selected")),
        Removal::AwaitingConfirmation => Err(ApiError::Conflict(format!(
            "Remove {} selected employee(s)? Confirm to continue",
            req.ids.len()
        ))),
    }
}
