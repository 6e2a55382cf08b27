//! Intake routes
//!
//! New registration requests and the stored registration details of a
//! client.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiJson, ApiQuery, DataResponse, ListResponse};
use crate::app::AppState;
use crate::domain::registration::RegistrationForm;
use crate::domain::requests::{self, DeleteRequestsRequest};
use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct RequestQueryParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequestsResponse {
    pub success: bool,
    pub message: String,
    pub deleted_ids: Vec<String>,
}

/// Database row for a stored registration, numeric columns read as text
#[derive(Debug, sqlx::FromRow)]
struct RegisterInfoRow {
    name: Option<String>,
    nick_name: Option<String>,
    mobile: Option<String>,
    email: Option<String>,
    job: Option<String>,
    plot_address: Option<String>,
    plot_area: Option<String>,
    design_type: Option<String>,
    preferred_offer: Option<String>,
    know_us_through: Option<String>,
    basement: Option<String>,
    ground_floor: Option<String>,
    first_floor: Option<String>,
    second_floor: Option<String>,
    rooftop: Option<String>,
    building_area: Option<String>,
    design_description: Option<String>,
}

impl From<RegisterInfoRow> for RegistrationForm {
    fn from(row: RegisterInfoRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            nick_name: row.nick_name.unwrap_or_default(),
            mobile: row.mobile.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            job: row.job.unwrap_or_default(),
            plot_address: row.plot_address.unwrap_or_default(),
            plot_area: row.plot_area.unwrap_or_default(),
            design_type: row.design_type.unwrap_or_default(),
            preferred_offer: row.preferred_offer.unwrap_or_default(),
            know_us_through: row.know_us_through.unwrap_or_default(),
            basement: row.basement.unwrap_or_default(),
            ground_floor: row.ground_floor.unwrap_or_default(),
            first_floor: row.first_floor.unwrap_or_default(),
            second_floor: row.second_floor.unwrap_or_default(),
            rooftop: row.rooftop.unwrap_or_default(),
            building_area: row.building_area.unwrap_or_default(),
            design_description: row.design_description.unwrap_or_default(),
        }
    }
}

/// GET /new-requests
///
/// List intake requests, optionally filtered by name or mobile.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RequestQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    // Whole rows as JSON: column names differ between installations
    let rows: Vec<serde_json::Value> =
        sqlx::query_scalar("SELECT to_jsonb(r) FROM new_requests r")
            .fetch_all(&state.db)
            .await?;

    let all = requests::map_rows(&rows);
    let data: Vec<_> = requests::filter_requests(&all, &params.q)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(total = all.len(), shown = data.len(), "Listed new requests");
    Ok(ListResponse::new(data, all.len()))
}

/// DELETE /new-requests
///
/// Delete the selected intake requests.
pub async fn delete_requests(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DeleteRequestsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = req
        .ids()
        .ok_or_else(|| ApiError::bad_request("Client IDs are required"))?;

    let result = sqlx::query("DELETE FROM new_requests WHERE id::text = ANY($1)")
        .bind(&ids)
        .execute(&state.db)
        .await?;

    tracing::info!(
        requested = ids.len(),
        deleted = result.rows_affected(),
        "Deleted new requests"
    );

    Ok(Json(DeleteRequestsResponse {
        success: true,
        message: format!("Successfully deleted {} client(s)", ids.len()),
        deleted_ids: ids,
    }))
}

/// GET /register-info/:id
///
/// Registration details of a client, falling back to the basic request
/// details when no registration was stored yet. Derived areas are
/// recomputed before returning.
pub async fn get_register_info(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let registered = sqlx::query_as::<_, RegisterInfoRow>(
        r#"
        SELECT name, nick_name, mobile, email, job, plot_address,
               plot_area::text AS plot_area,
               design_type, preferred_offer, know_us_through,
               basement::text AS basement,
               ground_floor::text AS ground_floor,
               first_floor::text AS first_floor,
               second_floor::text AS second_floor,
               rooftop::text AS rooftop,
               total_building_area::text AS building_area,
               design_description
        FROM register_info
        WHERE client_id::text = $1
        LIMIT 1
        "#,
    )
    .bind(&client_id)
    .fetch_optional(&state.db)
    .await?;

    let form: RegistrationForm = match registered {
        Some(row) => row.into(),
        None => {
            let row: Option<serde_json::Value> = sqlx::query_scalar(
                "SELECT to_jsonb(r) FROM new_requests r WHERE r.id::text = $1 LIMIT 1",
            )
            .bind(&client_id)
            .fetch_optional(&state.db)
            .await?;

            row.as_ref()
                .and_then(requests::map_single)
                .map(Into::into)
                .ok_or_else(|| ApiError::not_found("No user found with this ID"))?
        }
    };

    Ok(DataResponse::new(form.recomputed()))
}
