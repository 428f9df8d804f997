// AlumnosAdmin - core/age.rs
//
// Derived age: completed years between a birth date and a reference date.
// The reference date is always injected; nothing here reads the clock.

use crate::util::constants::FALLBACK_AGE;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Parse a calendar date as the backend serialises it.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times, and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]`. Returns `None` for anything else.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Completed years from `birth` to `today`.
///
/// `today.year - birth.year`, minus one if this year's birthday has not
/// been reached yet. Negative for birth dates after `today`.
pub fn compute_age_from(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Completed years from a raw birth date string to `today`.
///
/// Absent or unparsable input yields `FALLBACK_AGE` (0) instead of an
/// error, so a malformed record stays visible under the default age range
/// rather than disappearing from the list.
pub fn compute_age(birth_date: &str, today: NaiveDate) -> i32 {
    match parse_date(birth_date) {
        Some(birth) => compute_age_from(birth, today),
        None => {
            if !birth_date.trim().is_empty() {
                tracing::debug!(
                    len = birth_date.len(),
                    "Unparsable birth date; using fallback age"
                );
            }
            FALLBACK_AGE
        }
    }
}
