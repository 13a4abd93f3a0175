use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::location::LocationId;
use crate::domain::pricing::Tier;
use crate::domain::service::ServiceId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    OneTime,
}

impl Frequency {
    pub fn is_recurring(self) -> bool {
        !matches!(self, Frequency::OneTime)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::OneTime => "one_time",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "one_time" | "one-time" => Ok(Frequency::OneTime),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown frequency `{other}` (expected weekly|biweekly|monthly|one_time)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Quoted,
    Booked,
    Completed,
    Lost,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Quoted => "quoted",
            LeadStatus::Booked => "booked",
            LeadStatus::Completed => "completed",
            LeadStatus::Lost => "lost",
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "quoted" => Ok(LeadStatus::Quoted),
            "booked" => Ok(LeadStatus::Booked),
            "completed" => Ok(LeadStatus::Completed),
            "lost" => Ok(LeadStatus::Lost),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown lead status `{other}`"
            ))),
        }
    }
}

/// Raw quote-form input. Everything is optional at this layer; required-field
/// enforcement belongs to the surrounding form validation, and the scoring
/// engine treats every absent field as a zero-point signal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub service_id: Option<ServiceId>,
    pub location_id: Option<LocationId>,
    pub tier: Option<Tier>,
    pub frequency: Option<Frequency>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub submission: LeadSubmission,
    pub score: u8,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn from_submission(
        id: LeadId,
        submission: LeadSubmission,
        score: u8,
        now: DateTime<Utc>,
    ) -> Self {
        Self { id, submission, score, status: LeadStatus::New, created_at: now, updated_at: now }
    }

    pub fn can_transition_to(&self, next: LeadStatus) -> bool {
        matches!(
            (self.status, next),
            (LeadStatus::New, LeadStatus::Contacted)
                | (LeadStatus::Contacted, LeadStatus::Quoted)
                | (LeadStatus::Quoted, LeadStatus::Booked)
                | (LeadStatus::Booked, LeadStatus::Completed)
                | (LeadStatus::New, LeadStatus::Lost)
                | (LeadStatus::Contacted, LeadStatus::Lost)
                | (LeadStatus::Quoted, LeadStatus::Lost)
                | (LeadStatus::Booked, LeadStatus::Lost)
        )
    }

    pub fn transition_to(&mut self, next: LeadStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            self.updated_at = now;
            return Ok(());
        }

        Err(DomainError::InvalidLeadTransition { from: self.status, to: next })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::errors::DomainError;

    use super::{Lead, LeadId, LeadStatus, LeadSubmission};

    fn lead(status: LeadStatus) -> Lead {
        Lead {
            id: LeadId(Uuid::nil()),
            submission: LeadSubmission::default(),
            score: 40,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn allows_pipeline_transitions_in_order() {
        let mut lead = lead(LeadStatus::New);
        for next in
            [LeadStatus::Contacted, LeadStatus::Quoted, LeadStatus::Booked, LeadStatus::Completed]
        {
            lead.transition_to(next, Utc::now()).expect("pipeline step");
        }
        assert_eq!(lead.status, LeadStatus::Completed);
    }

    #[test]
    fn blocks_skipping_pipeline_steps() {
        let mut lead = lead(LeadStatus::New);
        let error = lead.transition_to(LeadStatus::Booked, Utc::now()).expect_err("new->booked");
        assert!(matches!(error, DomainError::InvalidLeadTransition { .. }));
    }

    #[test]
    fn any_open_lead_can_be_lost_but_terminal_states_stay_put() {
        let mut open = lead(LeadStatus::Quoted);
        open.transition_to(LeadStatus::Lost, Utc::now()).expect("quoted->lost");

        let mut completed = lead(LeadStatus::Completed);
        assert!(completed.transition_to(LeadStatus::Lost, Utc::now()).is_err());

        let mut lost = lead(LeadStatus::Lost);
        assert!(lost.transition_to(LeadStatus::Contacted, Utc::now()).is_err());
    }
}
