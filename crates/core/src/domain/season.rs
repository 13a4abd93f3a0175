use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::service::ServiceId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalModifierId(pub Uuid);

/// A calendar-window-scoped price multiplier for one service. The window is
/// inclusive on both ends and wraps across year-end when
/// `month_start > month_end` (11→3 covers {11, 12, 1, 2, 3}).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalModifier {
    pub id: SeasonalModifierId,
    pub service_id: ServiceId,
    pub label: String,
    pub month_start: u32,
    pub month_end: u32,
    pub multiplier: Decimal,
    /// Explicit resolution order; lower values win when windows overlap.
    pub priority: i32,
}

impl SeasonalModifier {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, month) in [("month_start", self.month_start), ("month_end", self.month_end)] {
            if !(1..=12).contains(&month) {
                return Err(DomainError::InvariantViolation(format!(
                    "{field} {month} outside calendar range 1..=12"
                )));
            }
        }
        if self.multiplier <= Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "multiplier must be positive (got {})",
                self.multiplier
            )));
        }
        Ok(())
    }

    pub fn applies_in(&self, month: u32) -> bool {
        if self.month_start <= self.month_end {
            (self.month_start..=self.month_end).contains(&month)
        } else {
            month >= self.month_start || month <= self.month_end
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::service::ServiceId;

    use super::{SeasonalModifier, SeasonalModifierId};

    fn modifier(month_start: u32, month_end: u32) -> SeasonalModifier {
        SeasonalModifier {
            id: SeasonalModifierId(Uuid::nil()),
            service_id: ServiceId(Uuid::nil()),
            label: "Off-season rate".to_string(),
            month_start,
            month_end,
            multiplier: Decimal::new(90, 2),
            priority: 0,
        }
    }

    #[test]
    fn wrapping_window_covers_exactly_the_wrapped_months() {
        let wrapping = modifier(11, 3);
        let covered: Vec<u32> = (1..=12).filter(|month| wrapping.applies_in(*month)).collect();
        assert_eq!(covered, vec![1, 2, 3, 11, 12]);
    }

    #[test]
    fn plain_window_is_inclusive_on_both_ends() {
        let fall = modifier(9, 11);
        assert!(fall.applies_in(9));
        assert!(fall.applies_in(11));
        assert!(!fall.applies_in(8));
        assert!(!fall.applies_in(12));
    }

    #[test]
    fn validation_rejects_bad_months_and_nonpositive_multipliers() {
        assert!(modifier(0, 3).validate().is_err());
        assert!(modifier(1, 13).validate().is_err());

        let mut free = modifier(1, 12);
        free.multiplier = Decimal::ZERO;
        assert!(free.validate().is_err());
    }
}
