use sqlx::{Executor, Row};
use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Services the demo catalog seeds, used for the post-load summary and the
/// verification contract.
const SEED_SERVICES: &[SeedServiceContract] = &[
    SeedServiceContract {
        slug: "lawn-mowing",
        name: "Weekly Lawn Mowing",
        category: "maintenance",
        description: "bracketed per-visit tiers with a Maplewood override and a wrapping off-season rate",
    },
    SeedServiceContract {
        slug: "fall-cleanup",
        name: "Fall Yard Cleanup",
        category: "cleanup",
        description: "single flat-rate package with a September-November demand surcharge",
    },
    SeedServiceContract {
        slug: "mulch-install",
        name: "Mulch Installation",
        category: "landscaping",
        description: "three unbracketed tiers with a spring installation surge",
    },
];

const SEED_SERVICE_COUNT: i64 = 3;
const SEED_LOCATION_COUNT: i64 = 2;
const SEED_PRICING_ROW_COUNT: i64 = 13;
const SEED_MODIFIER_COUNT: i64 = 3;
const SEED_LEAD_ID: &str = "e5e5e5e5-0000-4000-8000-000000000001";

struct SeedServiceContract {
    slug: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
}

#[derive(Clone, Debug)]
pub struct SeedServiceInfo {
    pub slug: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Debug)]
pub struct SeedResult {
    pub services_seeded: Vec<SeedServiceInfo>,
}

#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Deterministic demo catalog: three services, two locations, bracketed and
/// location-scoped pricing rows, wrapping and plain seasonal modifiers, and
/// one scored lead. Idempotent across runs.
pub struct DemoCatalog;

impl DemoCatalog {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_catalog.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        info!(event_name = "catalog.seed.loaded", services = SEED_SERVICES.len(), "demo catalog loaded");

        let services_seeded = SEED_SERVICES
            .iter()
            .map(|service| SeedServiceInfo {
                slug: service.slug,
                name: service.name,
                category: service.category,
                description: service.description,
            })
            .collect();

        Ok(SeedResult { services_seeded })
    }

    /// Check that the loaded catalog matches the seed contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        checks.push((
            "service-count",
            count(pool, "SELECT COUNT(*) AS count FROM services").await? == SEED_SERVICE_COUNT,
        ));
        checks.push((
            "location-count",
            count(pool, "SELECT COUNT(*) AS count FROM locations").await? == SEED_LOCATION_COUNT,
        ));
        checks.push((
            "pricing-row-count",
            count(pool, "SELECT COUNT(*) AS count FROM pricing_rows").await?
                == SEED_PRICING_ROW_COUNT,
        ));
        checks.push((
            "modifier-count",
            count(pool, "SELECT COUNT(*) AS count FROM seasonal_modifiers").await?
                == SEED_MODIFIER_COUNT,
        ));
        checks.push((
            "wrapping-modifier",
            count(
                pool,
                "SELECT COUNT(*) AS count FROM seasonal_modifiers WHERE month_start > month_end",
            )
            .await?
                > 0,
        ));
        checks.push((
            "location-override-row",
            count(pool, "SELECT COUNT(*) AS count FROM pricing_rows WHERE location_id IS NOT NULL")
                .await?
                > 0,
        ));
        checks.push((
            "inactive-row-retained",
            count(pool, "SELECT COUNT(*) AS count FROM pricing_rows WHERE active = 0").await? > 0,
        ));

        let lead_check = sqlx::query("SELECT score, status FROM leads WHERE id = ?")
            .bind(SEED_LEAD_ID)
            .fetch_optional(pool)
            .await?
            .map(|row| {
                row.get::<i64, _>("score") == 95 && row.get::<String, _>("status") == "new"
            })
            .unwrap_or(false);
        checks.push(("scored-lead", lead_check));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}

async fn count(pool: &DbPool, sql: &str) -> Result<i64, RepositoryError> {
    Ok(sqlx::query(sql).fetch_one(pool).await?.get::<i64, _>("count"))
}
