use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use turfquote_core::domain::lead::{Lead, LeadId, LeadStatus};
use turfquote_core::domain::location::Location;
use turfquote_core::domain::pricing::PricingRow;
use turfquote_core::domain::season::SeasonalModifier;
use turfquote_core::domain::service::{Service, ServiceId};

use super::{CatalogRepository, LeadRepository, RepositoryError};

/// Insertion-ordered in-memory catalog, mainly for engine tests and the
/// score preview path. Vec storage keeps the snapshot ordering contract that
/// the first-match modifier rule depends on.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    services: RwLock<Vec<Service>>,
    pricing_rows: RwLock<Vec<PricingRow>>,
    modifiers: RwLock<Vec<SeasonalModifier>>,
    locations: RwLock<Vec<Location>>,
}

impl InMemoryCatalogRepository {
    pub async fn insert_service(&self, service: Service) {
        self.services.write().await.push(service);
    }

    pub async fn insert_pricing_row(&self, row: PricingRow) {
        self.pricing_rows.write().await.push(row);
    }

    pub async fn insert_modifier(&self, modifier: SeasonalModifier) {
        self.modifiers.write().await.push(modifier);
    }

    pub async fn insert_location(&self, location: Location) {
        self.locations.write().await.push(location);
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn active_services(&self) -> Result<Vec<Service>, RepositoryError> {
        let services = self.services.read().await;
        Ok(services.iter().filter(|service| service.active).cloned().collect())
    }

    async fn find_service_by_slug(&self, slug: &str) -> Result<Option<Service>, RepositoryError> {
        let services = self.services.read().await;
        Ok(services.iter().find(|service| service.slug == slug).cloned())
    }

    async fn pricing_rows_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<PricingRow>, RepositoryError> {
        let rows = self.pricing_rows.read().await;
        Ok(rows.iter().filter(|row| &row.service_id == service_id).cloned().collect())
    }

    async fn modifiers_for_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Vec<SeasonalModifier>, RepositoryError> {
        let modifiers = self.modifiers.read().await;
        let mut matching: Vec<SeasonalModifier> = modifiers
            .iter()
            .filter(|modifier| &modifier.service_id == service_id)
            .cloned()
            .collect();
        matching.sort_by_key(|modifier| modifier.priority);
        Ok(matching)
    }

    async fn active_locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let locations = self.locations.read().await;
        Ok(locations.iter().filter(|location| location.active).cloned().collect())
    }

    async fn find_location_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        let locations = self.locations.read().await;
        Ok(locations.iter().find(|location| location.slug == slug).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<HashMap<LeadId, Lead>>,
}

#[async_trait::async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn insert(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut leads = self.leads.write().await;
        leads.insert(lead.id, lead);
        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let leads = self.leads.read().await;
        Ok(leads.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &LeadId,
        status: LeadStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("lead {}", id.0)))?;
        lead.status = status;
        lead.updated_at = updated_at;
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Lead>, RepositoryError> {
        let leads = self.leads.read().await;
        let mut recent: Vec<Lead> = leads.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}
