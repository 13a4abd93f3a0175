pub mod config;
pub mod domain;
pub mod errors;
pub mod quoting;

pub use domain::lead::{Frequency, Lead, LeadId, LeadStatus, LeadSubmission};
pub use domain::location::{Location, LocationId};
pub use domain::pricing::{LotSizeBracket, PricingRow, PricingRowId, Tier, Unit};
pub use domain::season::{SeasonalModifier, SeasonalModifierId};
pub use domain::service::{Service, ServiceId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use quoting::ranges::{compute_ranges, PriceRange, RangeRequest};
pub use quoting::season::{active_display_season, active_modifier, DisplaySeason};
pub use quoting::{
    AdditiveLeadScorer, CalendarSeasonResolver, DeterministicQuoteRuntime,
    DeterministicRangeCalculator, LeadScorer, QuoteEvaluation, QuoteEvaluationInput, QuoteRuntime,
    RangeCalculator, SeasonResolver,
};
