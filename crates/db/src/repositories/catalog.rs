use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use turfquote_core::domain::location::{Location, LocationId};
use turfquote_core::domain::pricing::{PricingRow, PricingRowId, Tier, Unit};
use turfquote_core::domain::season::{SeasonalModifier, SeasonalModifierId};
use turfquote_core::domain::service::{Service, ServiceId};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn active_services(&self) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, slug, name, category, active, display_order
             FROM services
             WHERE active = 1
             ORDER BY display_order, slug",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(service_from_row).collect()
    }

    async fn find_service_by_slug(&self, slug: &str) -> Result<Option<Service>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, slug, name, category, active, display_order
             FROM services
             WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(service_from_row).transpose()
    }

    async fn pricing_rows_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<PricingRow>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, service_id, location_id, tier, price_min, price_max, unit,
                    lot_size_min, lot_size_max, includes, active
             FROM pricing_rows
             WHERE service_id = ?
             ORDER BY id",
        )
        .bind(service_id.0.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(pricing_row_from_row).collect()
    }

    async fn modifiers_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<SeasonalModifier>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, service_id, label, month_start, month_end, multiplier, priority
             FROM seasonal_modifiers
             WHERE service_id = ?
             ORDER BY priority, id",
        )
        .bind(service_id.0.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(modifier_from_row).collect()
    }

    async fn active_locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, slug, name, active, latitude, longitude
             FROM locations
             WHERE active = 1
             ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(location_from_row).collect()
    }

    async fn find_location_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, slug, name, active, latitude, longitude
             FROM locations
             WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(location_from_row).transpose()
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|_| {
        RepositoryError::Decode(format!("column `{column}` holds malformed uuid `{value}`"))
    })
}

fn service_from_row(row: &SqliteRow) -> Result<Service, RepositoryError> {
    let id: String = row.try_get("id")?;
    Ok(Service {
        id: ServiceId(parse_uuid(&id, "services.id")?),
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        active: row.try_get("active")?,
        display_order: row.try_get("display_order")?,
    })
}

fn location_from_row(row: &SqliteRow) -> Result<Location, RepositoryError> {
    let id: String = row.try_get("id")?;
    Ok(Location {
        id: LocationId(parse_uuid(&id, "locations.id")?),
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        active: row.try_get("active")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

fn pricing_row_from_row(row: &SqliteRow) -> Result<PricingRow, RepositoryError> {
    let id: String = row.try_get("id")?;
    let service_id: String = row.try_get("service_id")?;
    let location_id: Option<String> = row.try_get("location_id")?;
    let tier: String = row.try_get("tier")?;
    let unit: String = row.try_get("unit")?;
    let includes: String = row.try_get("includes")?;

    Ok(PricingRow {
        id: PricingRowId(parse_uuid(&id, "pricing_rows.id")?),
        service_id: ServiceId(parse_uuid(&service_id, "pricing_rows.service_id")?),
        location_id: location_id
            .as_deref()
            .map(|value| parse_uuid(value, "pricing_rows.location_id").map(LocationId))
            .transpose()?,
        tier: Tier::from_str(&tier).map_err(|error| RepositoryError::Decode(error.to_string()))?,
        price_min: row.try_get("price_min")?,
        price_max: row.try_get("price_max")?,
        unit: Unit::from_str(&unit).map_err(|error| RepositoryError::Decode(error.to_string()))?,
        lot_size_min: lot_bound(row.try_get("lot_size_min")?, "lot_size_min")?,
        lot_size_max: lot_bound(row.try_get("lot_size_max")?, "lot_size_max")?,
        includes: serde_json::from_str(&includes).map_err(|error| {
            RepositoryError::Decode(format!("pricing_rows.includes is not a JSON list: {error}"))
        })?,
        active: row.try_get("active")?,
    })
}

fn lot_bound(value: Option<i64>, column: &str) -> Result<Option<u32>, RepositoryError> {
    value
        .map(|raw| {
            u32::try_from(raw).map_err(|_| {
                RepositoryError::Decode(format!(
                    "pricing_rows.{column} holds out-of-range value {raw}"
                ))
            })
        })
        .transpose()
}

fn modifier_from_row(row: &SqliteRow) -> Result<SeasonalModifier, RepositoryError> {
    let id: String = row.try_get("id")?;
    let service_id: String = row.try_get("service_id")?;
    let multiplier: String = row.try_get("multiplier")?;
    let month_start: i64 = row.try_get("month_start")?;
    let month_end: i64 = row.try_get("month_end")?;

    Ok(SeasonalModifier {
        id: SeasonalModifierId(parse_uuid(&id, "seasonal_modifiers.id")?),
        service_id: ServiceId(parse_uuid(&service_id, "seasonal_modifiers.service_id")?),
        label: row.try_get("label")?,
        month_start: month(month_start, "month_start")?,
        month_end: month(month_end, "month_end")?,
        // Stored as TEXT; SQLite has no decimal type and REAL would reopen
        // the float-rounding door the engine is built to avoid.
        multiplier: Decimal::from_str(&multiplier).map_err(|_| {
            RepositoryError::Decode(format!(
                "seasonal_modifiers.multiplier holds non-decimal value `{multiplier}`"
            ))
        })?,
        priority: row.try_get("priority")?,
    })
}

fn month(value: i64, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value).ok().filter(|month| (1..=12).contains(month)).ok_or_else(|| {
        RepositoryError::Decode(format!(
            "seasonal_modifiers.{column} holds out-of-range month {value}"
        ))
    })
}
