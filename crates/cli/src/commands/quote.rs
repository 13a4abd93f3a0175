use chrono::{Datelike, Utc};
use clap::Args;
use serde::Serialize;
use tracing::info;

use turfquote_core::config::{AppConfig, LoadOptions};
use turfquote_core::errors::ApplicationError;
use turfquote_core::quoting::ranges::PriceRange;
use turfquote_core::quoting::season::DisplaySeason;
use turfquote_core::{DeterministicQuoteRuntime, LotSizeBracket, QuoteEvaluationInput, QuoteRuntime};
use turfquote_db::repositories::{CatalogRepository, RepositoryError, SqlCatalogRepository};
use turfquote_db::connect_with_settings;

use crate::commands::CommandResult;

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[arg(long, help = "Service slug, e.g. lawn-mowing")]
    pub service: String,
    #[arg(long, help = "Location slug for location-scoped pricing")]
    pub location: Option<String>,
    #[arg(long, help = "Lot size bracket (small|medium|large|xlarge) or raw square footage")]
    pub lot_size: Option<String>,
    #[arg(long, help = "Evaluation month 1-12 (defaults to the current month)")]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    command: String,
    status: String,
    service: String,
    location: Option<String>,
    month: u32,
    display_season: DisplaySeason,
    seasonal_label: Option<String>,
    quote_valid_days: u32,
    ranges: Vec<PriceRange>,
}

pub fn run(args: QuoteArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "quote",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    // Captured once per invocation so the whole evaluation sees one month.
    let month = match args.month {
        Some(month) if (1..=12).contains(&month) => month,
        Some(month) => {
            return CommandResult::failure(
                "quote",
                "invalid_input",
                format!("month {month} outside calendar range 1..=12"),
                2,
            );
        }
        None => Utc::now().month(),
    };

    let lot_size_sqft = match parse_lot_size(args.lot_size.as_deref()) {
        Ok(lot_size_sqft) => lot_size_sqft,
        Err(message) => return CommandResult::failure("quote", "invalid_input", message, 2),
    };

    let location_slug = args.location.or(config.site.default_location_slug.clone());

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "quote",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let catalog = SqlCatalogRepository::new(pool.clone());

        let service = catalog
            .find_service_by_slug(&args.service)
            .await
            .map_err(catalog_error)?
            .ok_or_else(|| {
                ("not_found", format!("no service with slug `{}`", args.service), 6u8)
            })?;

        let location = match &location_slug {
            Some(slug) => Some(
                catalog.find_location_by_slug(slug).await.map_err(catalog_error)?.ok_or_else(
                    || ("not_found", format!("no location with slug `{slug}`"), 6u8),
                )?,
            ),
            None => None,
        };

        let rows = catalog.pricing_rows_for_service(&service.id).await.map_err(catalog_error)?;
        let modifiers =
            catalog.modifiers_for_service(&service.id).await.map_err(catalog_error)?;

        pool.close().await;

        let engine = DeterministicQuoteRuntime::default();
        let evaluation = engine.evaluate(QuoteEvaluationInput {
            rows: &rows,
            modifiers: &modifiers,
            location: location.as_ref().map(|location| &location.id),
            lot_size_sqft,
            month,
        });

        info!(
            event_name = "cli.quote.computed",
            service = %service.slug,
            month,
            range_count = evaluation.ranges.len(),
            "computed quote ranges"
        );

        Ok::<QuoteReport, (&'static str, String, u8)>(QuoteReport {
            command: "quote".to_string(),
            status: "ok".to_string(),
            service: service.slug,
            location: location.map(|location| location.slug),
            month,
            display_season: evaluation.display_season,
            seasonal_label: evaluation.seasonal_label,
            quote_valid_days: config.site.quote_validity_days,
            ranges: evaluation.ranges,
        })
    });

    match result {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => {
                CommandResult::failure("quote", "serialization", error.to_string(), 7)
            }
        },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("quote", error_class, message, exit_code)
        }
    }
}

fn catalog_error(error: RepositoryError) -> (&'static str, String, u8) {
    let application = ApplicationError::CatalogUnavailable(error.to_string());
    ("catalog_unavailable", application.to_string(), 4)
}

/// Brackets resolve to their representative square footage; anything else is
/// taken as raw square footage. Negative or non-finite numbers pass through
/// to the calculator, which treats them as "no lot size supplied".
fn parse_lot_size(value: Option<&str>) -> Result<Option<f64>, String> {
    let Some(value) = value else {
        return Ok(None);
    };

    if let Ok(bracket) = value.parse::<LotSizeBracket>() {
        return Ok(Some(f64::from(bracket.representative_sqft())));
    }

    value.trim().parse::<f64>().map(Some).map_err(|_| {
        format!("lot size `{value}` is neither a bracket (small|medium|large|xlarge) nor a number")
    })
}
