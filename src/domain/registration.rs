//! Client registration form
//!
//! The form keeps raw user input as strings. Derived floor areas and the
//! building area are recomputed from the inputs whenever the form is read.

use serde::{Deserialize, Serialize};

use super::areas::{self, FloorAreas, PlotAndBuildingMetrics};
use super::offers::{self, OfferTier};
use super::validation::MissingFields;

pub const DESIGN_TYPES: [&str; 4] = [
    "Villas and Apartments",
    "Residential Building",
    "Commercial Building",
    "Mixed-Use Building",
];

pub const PREFERRED_CONTACTS: [&str; 2] = ["Email", "WhatsApp"];

pub const KNOW_US_THROUGH: [&str; 5] = ["Instagram", "Twitter", "Friend", "Google", "Other"];

/// Choices offered by the registration form's selects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub design_types: &'static [&'static str],
    pub preferred_contacts: &'static [&'static str],
    pub know_us_through: &'static [&'static str],
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            design_types: &DESIGN_TYPES,
            preferred_contacts: &PREFERRED_CONTACTS,
            know_us_through: &KNOW_US_THROUGH,
        }
    }
}

/// Registration form, field for field as the client fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: String,
    pub nick_name: String,
    pub mobile: String,
    pub email: String,
    pub job: String,
    pub plot_address: String,
    pub plot_area: String,
    pub design_type: String,
    pub preferred_offer: String,
    pub know_us_through: String,
    pub basement: String,
    pub ground_floor: String,
    pub first_floor: String,
    pub second_floor: String,
    pub rooftop: String,
    pub building_area: String,
    pub design_description: String,
}

impl RegistrationForm {
    /// Bring derived fields in line with the inputs.
    ///
    /// Fixed-ratio floors are only rewritten when the plot area parses;
    /// the building area is always rewritten and left blank for a zero sum.
    pub fn recompute(&mut self) {
        if let Some(derived) = areas::derive(&self.plot_area) {
            self.ground_floor = derived.ground_floor.to_string();
            self.first_floor = derived.first_floor.to_string();
            self.rooftop = derived.rooftop.to_string();
        }

        self.building_area = areas::aggregate(&self.floors())
            .map(|area| area.to_string())
            .unwrap_or_default();
    }

    pub fn recomputed(mut self) -> Self {
        self.recompute();
        self
    }

    pub fn floors(&self) -> FloorAreas {
        FloorAreas::from_inputs(
            &self.basement,
            &self.ground_floor,
            &self.first_floor,
            &self.second_floor,
            &self.rooftop,
        )
    }

    pub fn metrics(&self) -> PlotAndBuildingMetrics {
        let floors = self.floors();

        PlotAndBuildingMetrics {
            plot_area: areas::parse_number(&self.plot_area),
            basement: floors.basement,
            ground_floor: areas::parse_number(&self.ground_floor),
            first_floor: areas::parse_number(&self.first_floor),
            second_floor: floors.second_floor,
            rooftop: areas::parse_number(&self.rooftop),
            building_area: areas::parse_number(&self.building_area),
        }
    }

    pub fn offers(&self) -> [OfferTier; 5] {
        offers::price(areas::parse_number(&self.building_area))
    }

    /// Fields a contract cannot be generated without.
    pub fn validate(&self) -> Result<(), MissingFields> {
        MissingFields::check([
            ("Full Name", self.name.as_str()),
            ("Mobile Number", self.mobile.as_str()),
            ("Email Address", self.email.as_str()),
            ("Plot Address", self.plot_address.as_str()),
            ("Plot Area", self.plot_area.as_str()),
            ("Design Type", self.design_type.as_str()),
        ])
    }
}
