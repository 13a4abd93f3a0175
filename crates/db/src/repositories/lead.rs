use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use turfquote_core::domain::lead::{Frequency, Lead, LeadId, LeadStatus, LeadSubmission};
use turfquote_core::domain::location::LocationId;
use turfquote_core::domain::pricing::Tier;
use turfquote_core::domain::service::ServiceId;

use super::catalog::parse_uuid;
use super::{LeadRepository, RepositoryError};
use crate::DbPool;

pub struct SqlLeadRepository {
    pool: DbPool,
}

impl SqlLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for SqlLeadRepository {
    async fn insert(&self, lead: Lead) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO leads (id, name, email, phone, address, city, zip,
                                service_id, location_id, tier, frequency, notes,
                                score, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(lead.id.0.to_string())
        .bind(&lead.submission.name)
        .bind(&lead.submission.email)
        .bind(&lead.submission.phone)
        .bind(&lead.submission.address)
        .bind(&lead.submission.city)
        .bind(&lead.submission.zip)
        .bind(lead.submission.service_id.map(|id| id.0.to_string()))
        .bind(lead.submission.location_id.map(|id| id.0.to_string()))
        .bind(lead.submission.tier.map(Tier::as_str))
        .bind(lead.submission.frequency.map(Frequency::as_str))
        .bind(&lead.submission.notes)
        .bind(i64::from(lead.score))
        .bind(lead.status.as_str())
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, address, city, zip,
                    service_id, location_id, tier, frequency, notes,
                    score, status, created_at, updated_at
             FROM leads
             WHERE id = ?",
        )
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(lead_from_row).transpose()
    }

    async fn update_status(
        &self,
        id: &LeadId,
        status: LeadStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE leads SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(updated_at)
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("lead {}", id.0)));
        }

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Lead>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, address, city, zip,
                    service_id, location_id, tier, frequency, notes,
                    score, status, created_at, updated_at
             FROM leads
             ORDER BY created_at DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(lead_from_row).collect()
    }
}

fn lead_from_row(row: &SqliteRow) -> Result<Lead, RepositoryError> {
    let id: String = row.try_get("id")?;
    let service_id: Option<String> = row.try_get("service_id")?;
    let location_id: Option<String> = row.try_get("location_id")?;
    let tier: Option<String> = row.try_get("tier")?;
    let frequency: Option<String> = row.try_get("frequency")?;
    let score: i64 = row.try_get("score")?;
    let status: String = row.try_get("status")?;

    let submission = LeadSubmission {
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        zip: row.try_get("zip")?,
        service_id: service_id
            .as_deref()
            .map(|value| parse_uuid(value, "leads.service_id").map(ServiceId))
            .transpose()?,
        location_id: location_id
            .as_deref()
            .map(|value| parse_uuid(value, "leads.location_id").map(LocationId))
            .transpose()?,
        tier: tier
            .as_deref()
            .map(Tier::from_str)
            .transpose()
            .map_err(|error| RepositoryError::Decode(error.to_string()))?,
        frequency: frequency
            .as_deref()
            .map(Frequency::from_str)
            .transpose()
            .map_err(|error| RepositoryError::Decode(error.to_string()))?,
        notes: row.try_get("notes")?,
    };

    Ok(Lead {
        id: LeadId(parse_uuid(&id, "leads.id")?),
        submission,
        score: u8::try_from(score).map_err(|_| {
            RepositoryError::Decode(format!("leads.score holds out-of-range value {score}"))
        })?,
        status: LeadStatus::from_str(&status)
            .map_err(|error| RepositoryError::Decode(error.to_string()))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
