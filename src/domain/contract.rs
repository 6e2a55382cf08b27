//! Contract generation
//!
//! Turns a completed registration and the chosen package into a new order
//! plus the document data the export side renders as PDF and spreadsheet.

use chrono::{DateTime, Local, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::offers::{format_grouped, OfferPrices, OfferSelection};
use super::orders::{activity_timestamp, order_number, ClientActivity, OrderRecord, OrderStatus};
use super::registration::RegistrationForm;
use super::validation::MissingFields;

pub const COMPANY_NAME: &str = "AMMAR CONSTRUCTION";

pub const CONTRACT_TERMS: [&str; 5] = [
    "1. This contract is valid for 30 days from the date of issue.",
    "2. Payment terms: 50% advance, 50% upon completion.",
    "3. Project timeline will be determined after contract acceptance.",
    "4. Any modifications must be agreed upon in writing.",
    "5. Quality standards will meet local building codes.",
];

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSection {
    pub heading: &'static str,
    pub rows: Vec<ContractRow>,
}

/// The package printed on the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOffer {
    pub package_number: usize,
    pub rate: Decimal,
    pub total: Decimal,
    pub total_display: String,
}

/// Everything the document and spreadsheet exporters need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDocument {
    pub company: &'static str,
    pub contract_date: String,
    pub file_stem: String,
    pub selected_offer: SelectedOffer,
    pub sections: Vec<ContractSection>,
    pub terms: &'static [&'static str],
}

#[cfg(test)]
impl ContractDocument {
    fn section(&self, heading: &str) -> Option<&ContractSection> {
        self.sections.iter().find(|section| section.heading == heading)
    }
}

/// A generated contract: the order to store and the document to export.
#[derive(Debug, Clone, Serialize)]
pub struct Contract {
    pub order: OrderRecord,
    pub document: ContractDocument,
}

fn row(label: &'static str, value: impl Into<String>) -> ContractRow {
    ContractRow {
        label,
        value: value.into(),
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Generate a contract for a registration.
///
/// The form is recomputed first so derived areas always match its inputs.
/// Fails with the list of missing required fields.
pub fn generate(
    form: RegistrationForm,
    selection: OfferSelection,
    now: DateTime<Local>,
    rng: &mut impl Rng,
) -> Result<Contract, MissingFields> {
    let form = form.recomputed();
    form.validate()?;

    let tiers = form.offers();
    let chosen = tiers[selection.tier().index()];
    let contract_date = now.format("%B %-d, %Y").to_string();
    let owner = if form.name.is_empty() { "contract" } else { form.name.as_str() };
    let file_stem = format!(
        "{owner}_Contract_{}",
        contract_date.split_whitespace().collect::<Vec<_>>().join("_")
    );

    let selected_offer = SelectedOffer {
        package_number: selection.package_number(),
        rate: chosen.rate,
        total: chosen.total,
        total_display: format!("{} SAR", format_grouped(chosen.total)),
    };

    let sections = vec![
        ContractSection {
            heading: "Client Information",
            rows: vec![
                row("Full Name", form.name.as_str()),
                row("Mobile", form.mobile.as_str()),
                row("Email", form.email.as_str()),
                row("Plot Address", form.plot_address.as_str()),
            ],
        },
        ContractSection {
            heading: "Project Details",
            rows: vec![
                row("Plot Area (m²)", form.plot_area.as_str()),
                row("Building Area (m²)", form.building_area.as_str()),
                row("Design Type", form.design_type.as_str()),
                row("Contract Date", contract_date.as_str()),
            ],
        },
        ContractSection {
            heading: "Selected Offer",
            rows: vec![
                row("Package", format!("Package {}", selected_offer.package_number)),
                row("Rate per m²", format!("{} SAR", selected_offer.rate)),
                row("Total Contract Value", selected_offer.total_display.as_str()),
            ],
        },
        ContractSection {
            heading: "Floor Details",
            rows: vec![
                row("Basement (m²)", or_default(&form.basement, "0")),
                row("Ground Floor (m²)", or_default(&form.ground_floor, "0")),
                row("First Floor (m²)", or_default(&form.first_floor, "0")),
                row("Second Floor (m²)", or_default(&form.second_floor, "0")),
                row("Rooftop (m²)", or_default(&form.rooftop, "0")),
            ],
        },
        ContractSection {
            heading: "Additional Information",
            rows: vec![
                row("Job Title", or_default(&form.job, NOT_SPECIFIED)),
                row("Nickname", or_default(&form.nick_name, NOT_SPECIFIED)),
                row("Preferred Contact", or_default(&form.preferred_offer, NOT_SPECIFIED)),
                row("How did you know us", or_default(&form.know_us_through, NOT_SPECIFIED)),
                row("Design Description", or_default(&form.design_description, NOT_SPECIFIED)),
            ],
        },
    ];

    let order = OrderRecord {
        id: Uuid::new_v4().to_string(),
        order_id: order_number(now.date_naive(), rng.gen_range(100..1000)),
        user_name: form.name.clone(),
        mobile: form.mobile.clone(),
        email: form.email.clone(),
        inserted_date: now.with_timezone(&Utc).date_naive(),
        status: OrderStatus::InReview,
        prices: OfferPrices::from(&tiers),
        client_activity: ClientActivity::NoResponse,
        last_activity_update: activity_timestamp(now.naive_local()),
    };

    Ok(Contract {
        order,
        document: ContractDocument {
            company: COMPANY_NAME,
            contract_date,
            file_stem,
            selected_offer,
            sections,
            terms: &CONTRACT_TERMS,
        },
    })
}
