//! Registration routes
//!
//! Quoting a registration form and turning it into a contract and order.

use axum::{extract::State, response::IntoResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{ApiJson, Created, DataResponse};
use crate::app::AppState;
use crate::domain::areas::PlotAndBuildingMetrics;
use crate::domain::contract::{self, Contract};
use crate::domain::offers::{OfferSelection, OfferTier};
use crate::domain::registration::{FormOptions, RegistrationForm};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub form: RegistrationForm,
    pub metrics: PlotAndBuildingMetrics,
    pub offers: [OfferTier; 5],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequest {
    pub form: RegistrationForm,
    #[serde(default)]
    pub selected_offer: OfferSelection,
}

/// GET /register/options
pub async fn get_options() -> impl IntoResponse {
    DataResponse::new(FormOptions::default())
}

/// POST /register/quote
///
/// Recompute derived areas and price every tier for the form as it stands.
pub async fn quote(ApiJson(form): ApiJson<RegistrationForm>) -> impl IntoResponse {
    let form = form.recomputed();

    DataResponse::new(QuoteResponse {
        metrics: form.metrics(),
        offers: form.offers(),
        form,
    })
}

/// POST /register/contract
///
/// Generate the contract for the selected tier and record its order.
pub async fn create_contract(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ContractRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Contract { order, document } = {
        let mut rng = rand::thread_rng();
        contract::generate(req.form, req.selected_offer, Local::now(), &mut rng)?
    };

    {
        let _guard = state.records.write_lock().await;
        let mut orders = state.records.orders_for_update().await?;
        orders.push(order.clone());
        state.records.save_orders(&orders).await?;
    }

    tracing::info!(
        order_id = %order.order_id,
        package = document.selected_offer.package_number,
        "Contract generated"
    );

    Ok(Created(Contract { order, document }))
}
