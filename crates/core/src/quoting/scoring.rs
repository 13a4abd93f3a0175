use crate::domain::lead::{Frequency, LeadSubmission};

pub const MAX_SCORE: u8 = 100;

/// Notes must carry more than this many characters (after trimming) to count
/// as a real project description.
pub const NOTES_MIN_CHARS: usize = 10;

const EMAIL_POINTS: u8 = 15;
const PHONE_POINTS: u8 = 15;
const ADDRESS_POINTS: u8 = 10;
const CITY_ZIP_POINTS: u8 = 5;
const SERVICE_POINTS: u8 = 10;
const RECURRING_POINTS: u8 = 15;
const LOCATION_POINTS: u8 = 5;
const NOTES_POINTS: u8 = 5;

/// Additive lead-quality score in [0, 100]. Signals are independent and
/// order-independent; a missing signal contributes zero. The same function
/// backs the pre-submission preview and the persisted score, so the two can
/// never drift.
pub fn score(submission: &LeadSubmission) -> u8 {
    let mut total: u32 = 0;

    if has_text(&submission.email) {
        total += u32::from(EMAIL_POINTS);
    }
    if has_text(&submission.phone) {
        total += u32::from(PHONE_POINTS);
    }
    if has_text(&submission.address) {
        total += u32::from(ADDRESS_POINTS);
    }
    if has_text(&submission.city) && has_text(&submission.zip) {
        total += u32::from(CITY_ZIP_POINTS);
    }
    if submission.service_id.is_some() {
        total += u32::from(SERVICE_POINTS);
    }
    if let Some(tier) = submission.tier {
        total += u32::from(tier.score_points());
    }
    if submission.frequency.map_or(false, Frequency::is_recurring) {
        total += u32::from(RECURRING_POINTS);
    }
    if submission.location_id.is_some() {
        total += u32::from(LOCATION_POINTS);
    }
    if has_substantial_notes(&submission.notes) {
        total += u32::from(NOTES_POINTS);
    }

    // The table sums to exactly 100 today; the clamp only matters if a
    // future signal is added without rebalancing.
    total.min(u32::from(MAX_SCORE)) as u8
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |text| !text.trim().is_empty())
}

fn has_substantial_notes(notes: &Option<String>) -> bool {
    notes.as_deref().map_or(false, |text| text.trim().chars().count() > NOTES_MIN_CHARS)
}
