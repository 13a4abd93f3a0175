pub mod ranges;
pub mod scoring;
pub mod season;

use serde::{Deserialize, Serialize};

use crate::domain::lead::LeadSubmission;
use crate::domain::location::LocationId;
use crate::domain::pricing::PricingRow;
use crate::domain::season::SeasonalModifier;

use self::ranges::{PriceRange, RangeRequest};
use self::season::DisplaySeason;

pub trait SeasonResolver: Send + Sync {
    fn active_modifier<'a>(
        &self,
        modifiers: &'a [SeasonalModifier],
        month: u32,
    ) -> Option<&'a SeasonalModifier>;

    fn display_season(&self, month: u32) -> DisplaySeason;
}

pub trait RangeCalculator: Send + Sync {
    fn compute(&self, request: RangeRequest<'_>) -> Vec<PriceRange>;
}

pub trait LeadScorer: Send + Sync {
    fn score(&self, submission: &LeadSubmission) -> u8;
}

#[derive(Default)]
pub struct CalendarSeasonResolver;

impl SeasonResolver for CalendarSeasonResolver {
    fn active_modifier<'a>(
        &self,
        modifiers: &'a [SeasonalModifier],
        month: u32,
    ) -> Option<&'a SeasonalModifier> {
        season::active_modifier(modifiers, month)
    }

    fn display_season(&self, month: u32) -> DisplaySeason {
        season::active_display_season(month)
    }
}

#[derive(Default)]
pub struct DeterministicRangeCalculator;

impl RangeCalculator for DeterministicRangeCalculator {
    fn compute(&self, request: RangeRequest<'_>) -> Vec<PriceRange> {
        ranges::compute_ranges(request)
    }
}

#[derive(Default)]
pub struct AdditiveLeadScorer;

impl LeadScorer for AdditiveLeadScorer {
    fn score(&self, submission: &LeadSubmission) -> u8 {
        scoring::score(submission)
    }
}

/// One quote request. `month` is the evaluation month, captured once by the
/// caller so a request that spans several engine calls stays
/// time-consistent.
#[derive(Clone, Debug)]
pub struct QuoteEvaluationInput<'a> {
    pub rows: &'a [PricingRow],
    pub modifiers: &'a [SeasonalModifier],
    pub location: Option<&'a LocationId>,
    pub lot_size_sqft: Option<f64>,
    pub month: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEvaluation {
    pub ranges: Vec<PriceRange>,
    pub display_season: DisplaySeason,
    pub seasonal_label: Option<String>,
}

pub trait QuoteRuntime: Send + Sync {
    fn evaluate(&self, input: QuoteEvaluationInput<'_>) -> QuoteEvaluation;
}

pub struct DeterministicQuoteRuntime<S, R> {
    season_resolver: S,
    range_calculator: R,
}

impl<S, R> DeterministicQuoteRuntime<S, R> {
    pub fn new(season_resolver: S, range_calculator: R) -> Self {
        Self { season_resolver, range_calculator }
    }
}

impl Default for DeterministicQuoteRuntime<CalendarSeasonResolver, DeterministicRangeCalculator> {
    fn default() -> Self {
        Self::new(CalendarSeasonResolver, DeterministicRangeCalculator)
    }
}

impl<S, R> QuoteRuntime for DeterministicQuoteRuntime<S, R>
where
    S: SeasonResolver,
    R: RangeCalculator,
{
    fn evaluate(&self, input: QuoteEvaluationInput<'_>) -> QuoteEvaluation {
        let modifier = self.season_resolver.active_modifier(input.modifiers, input.month);
        let ranges = self.range_calculator.compute(RangeRequest {
            rows: input.rows,
            modifier,
            location: input.location,
            lot_size_sqft: input.lot_size_sqft,
        });

        QuoteEvaluation {
            ranges,
            display_season: self.season_resolver.display_season(input.month),
            seasonal_label: modifier.map(|modifier| modifier.label.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::pricing::{PricingRow, PricingRowId, Tier, Unit};
    use crate::domain::season::{SeasonalModifier, SeasonalModifierId};
    use crate::domain::service::ServiceId;
    use crate::quoting::season::DisplaySeason;

    use super::{
        DeterministicQuoteRuntime, QuoteEvaluationInput, QuoteRuntime, RangeCalculator,
        SeasonResolver,
    };

    fn rows() -> Vec<PricingRow> {
        vec![PricingRow {
            id: PricingRowId(Uuid::new_v4()),
            service_id: ServiceId(Uuid::nil()),
            location_id: None,
            tier: Tier::Good,
            price_min: 40,
            price_max: 60,
            unit: Unit::PerVisit,
            lot_size_min: None,
            lot_size_max: None,
            includes: vec!["mow".to_string()],
            active: true,
        }]
    }

    fn modifiers() -> Vec<SeasonalModifier> {
        vec![SeasonalModifier {
            id: SeasonalModifierId(Uuid::new_v4()),
            service_id: ServiceId(Uuid::nil()),
            label: "Off-season rate".to_string(),
            month_start: 11,
            month_end: 3,
            multiplier: Decimal::new(90, 2),
            priority: 0,
        }]
    }

    #[test]
    fn runtime_resolves_the_month_once_and_threads_it_through() {
        let runtime = DeterministicQuoteRuntime::default();
        let rows = rows();
        let modifiers = modifiers();

        let january = runtime.evaluate(QuoteEvaluationInput {
            rows: &rows,
            modifiers: &modifiers,
            location: None,
            lot_size_sqft: None,
            month: 1,
        });
        assert_eq!(january.display_season, DisplaySeason::Winter);
        assert_eq!(january.seasonal_label.as_deref(), Some("Off-season rate"));
        assert_eq!((january.ranges[0].min, january.ranges[0].max), (36, 54));

        let july = runtime.evaluate(QuoteEvaluationInput {
            rows: &rows,
            modifiers: &modifiers,
            location: None,
            lot_size_sqft: None,
            month: 7,
        });
        assert_eq!(july.display_season, DisplaySeason::Summer);
        assert_eq!(july.seasonal_label, None);
        assert_eq!((july.ranges[0].min, july.ranges[0].max), (40, 60));
    }

    #[test]
    fn runtime_supports_explicit_engine_interfaces() {
        struct FixedSeason;

        impl SeasonResolver for FixedSeason {
            fn active_modifier<'a>(
                &self,
                _modifiers: &'a [SeasonalModifier],
                _month: u32,
            ) -> Option<&'a SeasonalModifier> {
                None
            }

            fn display_season(&self, _month: u32) -> DisplaySeason {
                DisplaySeason::Fall
            }
        }

        struct EmptyRanges;

        impl RangeCalculator for EmptyRanges {
            fn compute(&self, _request: crate::quoting::ranges::RangeRequest<'_>) -> Vec<crate::quoting::ranges::PriceRange> {
                Vec::new()
            }
        }

        let runtime = DeterministicQuoteRuntime::new(FixedSeason, EmptyRanges);
        let rows = rows();
        let modifiers = modifiers();

        let evaluation = runtime.evaluate(QuoteEvaluationInput {
            rows: &rows,
            modifiers: &modifiers,
            location: None,
            lot_size_sqft: None,
            month: 12,
        });

        assert!(evaluation.ranges.is_empty());
        assert_eq!(evaluation.display_season, DisplaySeason::Fall);
    }
}
