use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::location::LocationId;
use crate::domain::service::ServiceId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingRowId(pub Uuid);

/// Service package level. The enumeration order here is the display and
/// output order everywhere ranges are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Good,
    Better,
    Best,
    Standard,
}

impl Tier {
    pub const ENUMERATION_ORDER: [Tier; 4] = [Tier::Good, Tier::Better, Tier::Best, Tier::Standard];

    /// Lead-quality points awarded for choosing this tier. Keeping the value
    /// on the variant makes the good/better/best mutual exclusivity
    /// structural rather than a convention across boolean checks.
    pub fn score_points(self) -> u8 {
        match self {
            Tier::Best => 20,
            Tier::Better => 15,
            Tier::Good => 10,
            Tier::Standard => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Better => "better",
            Tier::Best => "best",
            Tier::Standard => "standard",
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Tier::Good),
            "better" => Ok(Tier::Better),
            "best" => Ok(Tier::Best),
            "standard" => Ok(Tier::Standard),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown tier `{other}` (expected good|better|best|standard)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    PerVisit,
    PerArea,
    PerLength,
    PerProject,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::PerVisit => "per_visit",
            Unit::PerArea => "per_area",
            Unit::PerLength => "per_length",
            Unit::PerProject => "per_project",
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per_visit" => Ok(Unit::PerVisit),
            "per_area" => Ok(Unit::PerArea),
            "per_length" => Ok(Unit::PerLength),
            "per_project" => Ok(Unit::PerProject),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown unit `{other}` (expected per_visit|per_area|per_length|per_project)"
            ))),
        }
    }
}

/// Coarse lot-size category offered on the quote form, mapped to a
/// representative square footage used only for bracket lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotSizeBracket {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl LotSizeBracket {
    pub fn representative_sqft(self) -> u32 {
        match self {
            LotSizeBracket::Small => 5_000,
            LotSizeBracket::Medium => 15_000,
            LotSizeBracket::Large => 30_000,
            LotSizeBracket::Xlarge => 50_000,
        }
    }
}

impl std::str::FromStr for LotSizeBracket {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(LotSizeBracket::Small),
            "medium" => Ok(LotSizeBracket::Medium),
            "large" => Ok(LotSizeBracket::Large),
            "xlarge" => Ok(LotSizeBracket::Xlarge),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown lot size bracket `{other}` (expected small|medium|large|xlarge)"
            ))),
        }
    }
}

/// One price row of the catalog. `location_id = None` is the default row,
/// applying wherever no location-scoped row exists for the same tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRow {
    pub id: PricingRowId,
    pub service_id: ServiceId,
    pub location_id: Option<LocationId>,
    pub tier: Tier,
    pub price_min: i64,
    pub price_max: i64,
    pub unit: Unit,
    pub lot_size_min: Option<u32>,
    pub lot_size_max: Option<u32>,
    pub includes: Vec<String>,
    pub active: bool,
}

impl PricingRow {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.price_min < 0 {
            return Err(DomainError::InvariantViolation(format!(
                "price_min must not be negative (got {})",
                self.price_min
            )));
        }
        if self.price_min > self.price_max {
            return Err(DomainError::InvariantViolation(format!(
                "price_min {} exceeds price_max {}",
                self.price_min, self.price_max
            )));
        }
        if let (Some(lot_min), Some(lot_max)) = (self.lot_size_min, self.lot_size_max) {
            if lot_min > lot_max {
                return Err(DomainError::InvariantViolation(format!(
                    "lot_size_min {lot_min} exceeds lot_size_max {lot_max}"
                )));
            }
        }
        Ok(())
    }

    /// Inclusive bracket containment; an absent bound is unbounded on that
    /// side.
    pub fn bracket_contains(&self, sqft: u32) -> bool {
        let above_min = self.lot_size_min.map_or(true, |lot_min| sqft >= lot_min);
        let below_max = self.lot_size_max.map_or(true, |lot_max| sqft <= lot_max);
        above_min && below_max
    }
}

/// Within one service, active rows of the same tier and location scope must
/// not have overlapping lot-size brackets; otherwise bracket lookup would be
/// ambiguous.
pub fn assert_no_bracket_overlap(rows: &[PricingRow]) -> Result<(), DomainError> {
    for (index, row) in rows.iter().enumerate() {
        if !row.active {
            continue;
        }
        for other in rows.iter().skip(index + 1) {
            if !other.active
                || other.service_id != row.service_id
                || other.tier != row.tier
                || other.location_id != row.location_id
            {
                continue;
            }
            if brackets_overlap(row, other) {
                return Err(DomainError::InvariantViolation(format!(
                    "overlapping lot-size brackets for service {:?} tier {}",
                    row.service_id,
                    row.tier.as_str()
                )));
            }
        }
    }
    Ok(())
}

fn brackets_overlap(a: &PricingRow, b: &PricingRow) -> bool {
    let a_min = a.lot_size_min.unwrap_or(u32::MIN);
    let a_max = a.lot_size_max.unwrap_or(u32::MAX);
    let b_min = b.lot_size_min.unwrap_or(u32::MIN);
    let b_max = b.lot_size_max.unwrap_or(u32::MAX);
    a_min <= b_max && b_min <= a_max
}
