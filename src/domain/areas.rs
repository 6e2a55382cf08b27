//! Floor-area derivation
//!
//! Ground floor, first floor and rooftop follow from the plot area by fixed
//! ratios; the building area is the sum of all five floors.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::str::FromStr;

/// Share of the plot area built on the ground floor and on the first floor.
pub const FLOOR_RATIO: Decimal = Decimal::from_parts(6, 0, 0, false, 1);

/// Share of the plot area built on the rooftop.
pub const ROOFTOP_RATIO: Decimal = Decimal::from_parts(42, 0, 0, false, 2);

/// Parse a raw form value as a number.
///
/// Blank or non-numeric input yields `None`; callers decide whether that
/// means "skip" or "zero".
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Round to two decimal places and always carry a scale of two, so that
/// zero renders as `0.00`.
pub fn round_area(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Floors that follow from the plot area alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFloors {
    pub ground_floor: Decimal,
    pub first_floor: Decimal,
    pub rooftop: Decimal,
}

impl DerivedFloors {
    pub fn from_plot_area(plot_area: Decimal) -> Self {
        let floor = round_area(plot_area.saturating_mul(FLOOR_RATIO));

        Self {
            ground_floor: floor,
            first_floor: floor,
            rooftop: round_area(plot_area.saturating_mul(ROOFTOP_RATIO)),
        }
    }
}

/// Derive the fixed-ratio floors from a raw plot area.
///
/// Returns `None` when the plot area does not parse; the caller keeps
/// whatever values it already had.
pub fn derive(plot_area: &str) -> Option<DerivedFloors> {
    parse_number(plot_area).map(DerivedFloors::from_plot_area)
}

/// The five floor components of a building, blanks already coerced to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloorAreas {
    pub basement: Decimal,
    pub ground_floor: Decimal,
    pub first_floor: Decimal,
    pub second_floor: Decimal,
    pub rooftop: Decimal,
}

impl FloorAreas {
    pub fn from_inputs(
        basement: &str,
        ground_floor: &str,
        first_floor: &str,
        second_floor: &str,
        rooftop: &str,
    ) -> Self {
        let coerce = |raw: &str| parse_number(raw).unwrap_or(Decimal::ZERO);

        Self {
            basement: coerce(basement),
            ground_floor: coerce(ground_floor),
            first_floor: coerce(first_floor),
            second_floor: coerce(second_floor),
            rooftop: coerce(rooftop),
        }
    }

    pub fn sum(&self) -> Decimal {
        [
            self.basement,
            self.ground_floor,
            self.first_floor,
            self.second_floor,
            self.rooftop,
        ]
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// Total building area, or `None` while there is nothing to add up.
pub fn aggregate(floors: &FloorAreas) -> Option<Decimal> {
    let sum = floors.sum();
    if sum.is_zero() {
        None
    } else {
        Some(round_area(sum))
    }
}

/// Inputs and derived outputs of one registration, as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotAndBuildingMetrics {
    pub plot_area: Option<Decimal>,
    pub basement: Decimal,
    pub ground_floor: Option<Decimal>,
    pub first_floor: Option<Decimal>,
    pub second_floor: Decimal,
    pub rooftop: Option<Decimal>,
    pub building_area: Option<Decimal>,
}
