use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::service::validate_slug;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub Uuid);

/// A served town or neighborhood. Used only as a lookup key for pricing-row
/// overrides; the engine never mutates locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub slug: String,
    pub name: String,
    pub active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_slug(&self.slug)?;
        if let Some(latitude) = self.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(DomainError::InvariantViolation(format!(
                    "latitude {latitude} outside [-90, 90]"
                )));
            }
        }
        if let Some(longitude) = self.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(DomainError::InvariantViolation(format!(
                    "longitude {longitude} outside [-180, 180]"
                )));
            }
        }
        Ok(())
    }
}
