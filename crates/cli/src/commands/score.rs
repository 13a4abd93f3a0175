use chrono::Utc;
use clap::Args;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use turfquote_core::config::{AppConfig, LoadOptions};
use turfquote_core::domain::lead::{Frequency, Lead, LeadId, LeadSubmission};
use turfquote_core::quoting::scoring;
use turfquote_core::Tier;
use turfquote_db::connect_with_settings;
use turfquote_db::repositories::{
    CatalogRepository, LeadRepository, SqlCatalogRepository, SqlLeadRepository,
};

use crate::commands::CommandResult;

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long, help = "Service slug, resolved against the catalog")]
    pub service: Option<String>,
    #[arg(long, help = "Location slug, resolved against the catalog")]
    pub location: Option<String>,
    #[arg(long, help = "Tier choice (good|better|best|standard)")]
    pub tier: Option<String>,
    #[arg(long, help = "Requested frequency (weekly|biweekly|monthly|one_time)")]
    pub frequency: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, help = "Persist the scored lead with status `new`")]
    pub save: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    command: String,
    status: String,
    score: u8,
    max_score: u8,
    saved: bool,
    lead_id: Option<String>,
}

pub fn run(args: ScoreArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "score",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let tier = match args.tier.as_deref().map(str::parse::<Tier>).transpose() {
        Ok(tier) => tier,
        Err(error) => {
            return CommandResult::failure("score", "invalid_input", error.to_string(), 2);
        }
    };
    let frequency = match args.frequency.as_deref().map(str::parse::<Frequency>).transpose() {
        Ok(frequency) => frequency,
        Err(error) => {
            return CommandResult::failure("score", "invalid_input", error.to_string(), 2);
        }
    };

    let mut submission = LeadSubmission {
        name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        zip: args.zip,
        service_id: None,
        location_id: None,
        tier,
        frequency,
        notes: args.notes,
    };

    // The catalog is only consulted when a slug has to be resolved or the
    // lead is being persisted; a bare preview stays entirely offline.
    let needs_catalog = args.save || args.service.is_some() || args.location.is_some();
    if !needs_catalog {
        let score = scoring::score(&submission);
        return report(score, false, None);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "score",
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

        if let Some(slug) = &args.service {
            let service = catalog
                .find_service_by_slug(slug)
                .await
                .map_err(|error| ("catalog_unavailable", error.to_string(), 4u8))?
                .ok_or_else(|| ("not_found", format!("no service with slug `{slug}`"), 6u8))?;
            submission.service_id = Some(service.id);
        }
        if let Some(slug) = &args.location {
            let location = catalog
                .find_location_by_slug(slug)
                .await
                .map_err(|error| ("catalog_unavailable", error.to_string(), 4u8))?
                .ok_or_else(|| ("not_found", format!("no location with slug `{slug}`"), 6u8))?;
            submission.location_id = Some(location.id);
        }

        // Preview and persisted score come from the same function by
        // construction; there is no second scoring path to drift.
        let score = scoring::score(&submission);

        let lead_id = if args.save {
            let lead = Lead::from_submission(LeadId(Uuid::new_v4()), submission, score, Utc::now());
            let id = lead.id;
            SqlLeadRepository::new(pool.clone())
                .insert(lead)
                .await
                .map_err(|error| ("persistence", error.to_string(), 5u8))?;

            info!(
                event_name = "cli.lead.saved",
                lead_id = %id.0,
                score,
                "persisted scored lead"
            );
            Some(id.0.to_string())
        } else {
            None
        };

        pool.close().await;
        Ok::<(u8, Option<String>), (&'static str, String, u8)>((score, lead_id))
    });

    match result {
        Ok((score, lead_id)) => report(score, lead_id.is_some(), lead_id),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("score", error_class, message, exit_code)
        }
    }
}

fn report(score: u8, saved: bool, lead_id: Option<String>) -> CommandResult {
    let payload = ScoreReport {
        command: "score".to_string(),
        status: "ok".to_string(),
        score,
        max_score: scoring::MAX_SCORE,
        saved,
        lead_id,
    };

    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("score", "serialization", error.to_string(), 7),
    }
}
