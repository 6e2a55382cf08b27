//! Offer pricing
//!
//! Five fixed packages, each priced per square metre of building area.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Offer package, ordered by rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierName {
    Basic,
    Standard,
    Premium,
    Deluxe,
    Ultimate,
}

impl TierName {
    pub const ALL: [TierName; 5] = [
        Self::Basic,
        Self::Standard,
        Self::Premium,
        Self::Deluxe,
        Self::Ultimate,
    ];

    /// SAR per square metre.
    pub fn rate(self) -> Decimal {
        match self {
            Self::Basic => Decimal::from(7),
            Self::Standard => Decimal::from(10),
            Self::Premium => Decimal::from(15),
            Self::Deluxe => Decimal::from(20),
            Self::Ultimate => Decimal::from(25),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
            Self::Deluxe => "Deluxe",
            Self::Ultimate => "Ultimate",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One priced package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTier {
    pub index: usize,
    pub name: TierName,
    pub label: &'static str,
    pub rate: Decimal,
    pub total: Decimal,
}

/// Price every package for the given building area. A missing area prices
/// at zero.
pub fn price(building_area: Option<Decimal>) -> [OfferTier; 5] {
    let area = building_area.unwrap_or(Decimal::ZERO);

    TierName::ALL.map(|name| OfferTier {
        index: name.index(),
        name,
        label: name.label(),
        rate: name.rate(),
        total: name.rate().saturating_mul(area),
    })
}

/// Totals of all packages keyed by tier name, as stored on an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferPrices {
    pub basic: Decimal,
    pub standard: Decimal,
    pub premium: Decimal,
    pub deluxe: Decimal,
    pub ultimate: Decimal,
}

impl From<&[OfferTier; 5]> for OfferPrices {
    fn from(tiers: &[OfferTier; 5]) -> Self {
        let [basic, standard, premium, deluxe, ultimate] = tiers.map(|tier| tier.total);
        Self {
            basic,
            standard,
            premium,
            deluxe,
            ultimate,
        }
    }
}

/// The package a client picked. Defaults to Premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct OfferSelection(TierName);

impl OfferSelection {
    pub fn tier(self) -> TierName {
        self.0
    }

    /// One-based package number shown on contracts.
    pub fn package_number(self) -> usize {
        self.0.index() + 1
    }
}

impl Default for OfferSelection {
    fn default() -> Self {
        Self(TierName::Premium)
    }
}

impl TryFrom<usize> for OfferSelection {
    type Error = String;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        TierName::ALL
            .get(index)
            .copied()
            .map(Self)
            .ok_or_else(|| format!("Offer index must be between 0 and 4, got {index}"))
    }
}

impl From<OfferSelection> for usize {
    fn from(selection: OfferSelection) -> Self {
        selection.0.index()
    }
}

/// Render an amount the way an en-US locale does: comma thousands
/// separators and at most three fraction digits.
pub fn format_grouped(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
