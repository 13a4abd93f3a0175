use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use turfquote_core::domain::lead::{Lead, LeadId, LeadStatus};
use turfquote_core::domain::location::Location;
use turfquote_core::domain::pricing::PricingRow;
use turfquote_core::domain::season::SeasonalModifier;
use turfquote_core::domain::service::{Service, ServiceId};

pub mod catalog;
pub mod lead;
pub mod memory;

pub use catalog::SqlCatalogRepository;
pub use lead::SqlLeadRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryLeadRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Read-only snapshot source for the quoting engine. Implementations must
/// return pricing rows and modifiers in a stable order; modifier order is
/// `priority ASC, id ASC` and feeds the first-match resolution rule.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn active_services(&self) -> Result<Vec<Service>, RepositoryError>;

    async fn find_service_by_slug(&self, slug: &str) -> Result<Option<Service>, RepositoryError>;

    async fn pricing_rows_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<PricingRow>, RepositoryError>;

    async fn modifiers_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<SeasonalModifier>, RepositoryError>;

    async fn active_locations(&self) -> Result<Vec<Location>, RepositoryError>;

    async fn find_location_by_slug(&self, slug: &str)
        -> Result<Option<Location>, RepositoryError>;
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, lead: Lead) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;

    async fn update_status(
        &self,
        id: &LeadId,
        status: LeadStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    async fn list_recent(&self, limit: u32) -> Result<Vec<Lead>, RepositoryError>;
}
