use serde::{Deserialize, Serialize};

use crate::domain::season::SeasonalModifier;

/// Site theming state derived purely from the calendar month. Independent of
/// per-service seasonal modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySeason {
    Summer,
    Fall,
    Winter,
}

impl DisplaySeason {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplaySeason::Summer => "summer",
            DisplaySeason::Fall => "fall",
            DisplaySeason::Winter => "winter",
        }
    }
}

/// First modifier (in catalog order) whose month window contains `month`.
/// Catalog order is `priority ASC, id ASC`; callers must not assume any
/// tie-breaking beyond that.
pub fn active_modifier(modifiers: &[SeasonalModifier], month: u32) -> Option<&SeasonalModifier> {
    modifiers.iter().find(|modifier| modifier.applies_in(month))
}

/// Total partition of the calendar: March through August reads as summer
/// (the spring window folds into the summer theme), September through
/// November as fall, and the remaining wrap-around window as winter.
pub fn active_display_season(month: u32) -> DisplaySeason {
    match month {
        3..=8 => DisplaySeason::Summer,
        9..=11 => DisplaySeason::Fall,
        _ => DisplaySeason::Winter,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::season::{SeasonalModifier, SeasonalModifierId};
    use crate::domain::service::ServiceId;

    use super::{active_display_season, active_modifier, DisplaySeason};

    fn modifier(label: &str, month_start: u32, month_end: u32) -> SeasonalModifier {
        SeasonalModifier {
            id: SeasonalModifierId(Uuid::new_v4()),
            service_id: ServiceId(Uuid::nil()),
            label: label.to_string(),
            month_start,
            month_end,
            multiplier: Decimal::new(110, 2),
            priority: 0,
        }
    }

    #[test]
    fn wrapping_modifier_matches_only_its_window() {
        let modifiers = vec![modifier("Off-season rate", 11, 3)];

        for month in [11, 12, 1, 2, 3] {
            assert!(active_modifier(&modifiers, month).is_some(), "month {month}");
        }
        assert!(active_modifier(&modifiers, 6).is_none());
        assert!(active_modifier(&modifiers, 10).is_none());
    }

    #[test]
    fn first_match_in_input_order_wins() {
        let modifiers = vec![modifier("Early bird", 3, 6), modifier("Late spring", 5, 7)];

        let resolved = active_modifier(&modifiers, 5).expect("month 5 matches both");
        assert_eq!(resolved.label, "Early bird");
    }

    #[test]
    fn no_modifiers_resolves_to_none() {
        assert!(active_modifier(&[], 7).is_none());
    }

    #[test]
    fn display_season_is_total_and_folds_spring_into_summer() {
        let expected = [
            (1, DisplaySeason::Winter),
            (2, DisplaySeason::Winter),
            (3, DisplaySeason::Summer),
            (4, DisplaySeason::Summer),
            (5, DisplaySeason::Summer),
            (6, DisplaySeason::Summer),
            (7, DisplaySeason::Summer),
            (8, DisplaySeason::Summer),
            (9, DisplaySeason::Fall),
            (10, DisplaySeason::Fall),
            (11, DisplaySeason::Fall),
            (12, DisplaySeason::Winter),
        ];

        for (month, season) in expected {
            assert_eq!(active_display_season(month), season, "month {month}");
        }
    }
}
