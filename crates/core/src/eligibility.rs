//! Age-based priority eligibility.
//!
//! A living person with a known birth date qualifies for priority once they
//! were born strictly before the cutoff `today - threshold * 365.25 days`.
//! The year length is the fractional 365.25-day approximation, not calendar
//! year subtraction, so boundary dates match the historical batch job.

use chrono::Days;

use crate::types::Date;

/// Default age threshold (in years) for priority status.
pub const DEFAULT_AGE_THRESHOLD_YEARS: i32 = 60;

/// Number of whole days subtracted from `today` for a threshold in years.
///
/// `threshold * 365.25` with the fractional day dropped the way whole-day
/// date arithmetic drops it (toward negative infinity). Computed in
/// integers as `floor(threshold * 1461 / 4)` so no float rounding leaks in.
pub fn cutoff_offset_days(age_threshold_years: i32) -> i64 {
    (i64::from(age_threshold_years) * 1461).div_euclid(4)
}

/// Outcome of the cutoff computation.
///
/// Very large thresholds push the cutoff past the representable date range;
/// the saturated variants keep the comparison well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    /// Everyone born strictly before this date is old enough.
    Date(Date),
    /// Cutoff precedes the earliest representable date: nobody is old enough.
    BeforeAll,
    /// Cutoff follows the latest representable date: everybody is old enough.
    AfterAll,
}

impl Cutoff {
    /// Whether a birth date falls strictly before the cutoff.
    pub fn is_before(self, birth_date: Date) -> bool {
        match self {
            Cutoff::Date(cutoff) => birth_date < cutoff,
            Cutoff::BeforeAll => false,
            Cutoff::AfterAll => true,
        }
    }

    /// The concrete cutoff date, if it is representable.
    pub fn date(self) -> Option<Date> {
        match self {
            Cutoff::Date(d) => Some(d),
            _ => None,
        }
    }
}

/// Compute the birth-date cutoff for `age_threshold_years` as of `today`.
///
/// Zero and negative thresholds are accepted and yield a cutoff on or after
/// `today`.
pub fn cutoff_date(today: Date, age_threshold_years: i32) -> Cutoff {
    let offset = cutoff_offset_days(age_threshold_years);
    let shifted = if offset >= 0 {
        today.checked_sub_days(Days::new(offset.unsigned_abs()))
    } else {
        today.checked_add_days(Days::new(offset.unsigned_abs()))
    };

    match shifted {
        Some(date) => Cutoff::Date(date),
        None if offset >= 0 => Cutoff::BeforeAll,
        None => Cutoff::AfterAll,
    }
}

/// Decide whether a person qualifies for priority status.
///
/// - Deceased persons never qualify, whatever their age.
/// - An unknown birth date cannot establish eligibility.
/// - Otherwise the birth date must fall strictly before the cutoff; being
///   born exactly on the cutoff date does not qualify.
pub fn is_priority_eligible(
    birth_date: Option<Date>,
    deceased: bool,
    today: Date,
    age_threshold_years: i32,
) -> bool {
    if deceased {
        return false;
    }
    match birth_date {
        Some(born) => cutoff_date(today, age_threshold_years).is_before(born),
        None => false,
    }
}

/// Completed years of age for display, using 365-day years.
pub fn age_in_years(birth_date: Date, today: Date) -> i64 {
    (today - birth_date).num_days().div_euclid(365)
}
