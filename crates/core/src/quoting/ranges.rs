use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::location::LocationId;
use crate::domain::pricing::{PricingRow, Tier, Unit};
use crate::domain::season::SeasonalModifier;

/// One request against the calculator: a catalog snapshot plus the caller's
/// selections. `lot_size_sqft` is accepted as the raw form value; negative or
/// non-finite input degrades to "no lot size supplied" rather than erroring.
#[derive(Clone, Debug)]
pub struct RangeRequest<'a> {
    pub rows: &'a [PricingRow],
    pub modifier: Option<&'a SeasonalModifier>,
    pub location: Option<&'a LocationId>,
    pub lot_size_sqft: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub tier: Tier,
    pub min: i64,
    pub max: i64,
    pub unit: Unit,
    pub includes: Vec<String>,
    pub seasonal_multiplier: Decimal,
    pub seasonal_label: Option<String>,
}

/// Resolve tier price ranges from raw pricing rows.
///
/// Candidate rows are the active ones whose bracket contains the requested
/// lot size (no bracket filtering without a lot size) and whose location
/// scope is either default or exactly the requested location. Within each
/// tier, location-scoped rows displace the default rows entirely; the two
/// sets are never merged. Tiers are emitted in fixed enumeration order with
/// the seasonal multiplier applied to both bounds and each bound rounded
/// half-away-from-zero to a whole dollar.
pub fn compute_ranges(request: RangeRequest<'_>) -> Vec<PriceRange> {
    let lot_size = sanitize_lot_size(request.lot_size_sqft);
    let multiplier = request.modifier.map_or(Decimal::ONE, |modifier| modifier.multiplier);
    let label = request.modifier.map(|modifier| modifier.label.clone());

    let candidates: Vec<&PricingRow> = request
        .rows
        .iter()
        .filter(|row| row.active)
        .filter(|row| match (&row.location_id, request.location) {
            (None, _) => true,
            (Some(scope), Some(requested)) => scope == requested,
            (Some(_), None) => false,
        })
        .filter(|row| lot_size.map_or(true, |sqft| row.bracket_contains(sqft)))
        .collect();

    let mut ranges = Vec::new();
    for tier in Tier::ENUMERATION_ORDER {
        let tier_rows: Vec<&PricingRow> =
            candidates.iter().copied().filter(|row| row.tier == tier).collect();

        let chosen: Vec<&PricingRow> = if tier_rows.iter().any(|row| row.location_id.is_some()) {
            tier_rows.into_iter().filter(|row| row.location_id.is_some()).collect()
        } else {
            tier_rows
        };

        let (Some(min), Some(max)) = (
            chosen.iter().map(|row| row.price_min).min(),
            chosen.iter().map(|row| row.price_max).max(),
        ) else {
            continue;
        };

        let first = chosen[0];
        ranges.push(PriceRange {
            tier,
            min: apply_multiplier(min, multiplier),
            max: apply_multiplier(max, multiplier),
            unit: first.unit,
            includes: first.includes.clone(),
            seasonal_multiplier: multiplier,
            seasonal_label: label.clone(),
        });
    }

    ranges
}

fn sanitize_lot_size(value: Option<f64>) -> Option<u32> {
    let value = value?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.round() as u32)
}

fn apply_multiplier(amount: i64, multiplier: Decimal) -> i64 {
    (Decimal::from(amount) * multiplier)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        // Only reachable if the product leaves i64 range; keep the unscaled
        // bound rather than panicking mid-quote.
        .unwrap_or(amount)
}
