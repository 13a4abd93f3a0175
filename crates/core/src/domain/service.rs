use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub Uuid);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub active: bool,
    pub display_order: i32,
}

impl Service {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_slug(&self.slug)?;
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("service name must not be empty".into()));
        }
        Ok(())
    }
}

/// Slugs are URL path segments: lowercase ASCII alphanumerics separated by
/// single hyphens, no leading or trailing hyphen.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');

    if well_formed {
        Ok(())
    } else {
        Err(DomainError::InvariantViolation(format!("malformed slug `{slug}`")))
    }
}
