//! Booking cutoff: a slot may not be booked once its start is within the
//! grace window of the venue's current time.
//!
//! The check is best-effort. Anything it cannot evaluate (missing or
//! malformed input, no zone data, a local time that does not exist) is
//! reported as [`CutoffCheck::Skipped`] and treated as allowed.

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use tracing::warn;

use crate::catalog::{parse_date, slot_start};
use crate::clock::VenueZone;

/// Minimum lead time between "now" and a slot's start.
pub const BOOKING_GRACE_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum CutoffCheck {
    Allowed,
    TooSoon {
        slot_start: DateTime<FixedOffset>,
        earliest_allowed: DateTime<FixedOffset>,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("no date supplied")]
    MissingDate,
    #[error("no timeslot supplied")]
    MissingTimeslot,
    #[error("unparseable date {0:?}")]
    InvalidDate(String),
    #[error("unparseable timeslot {0:?}")]
    InvalidTimeslot(String),
    #[error("no zone data for {0:?}")]
    UnknownZone(String),
    #[error("{0} does not exist in the venue time zone")]
    NonexistentLocalTime(String),
}

impl CutoffCheck {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CutoffCheck::TooSoon { .. })
    }
}

/// Checks the first timeslot of a booking against `now`.
pub fn check_cutoff(
    zone: &VenueZone,
    date: &str,
    first_timeslot: Option<&str>,
    now: DateTime<Utc>,
) -> CutoffCheck {
    match evaluate(zone, date, first_timeslot, now) {
        Ok(check) => check,
        Err(reason) => {
            warn!("Skipping booking cutoff check for {} {:?}: {}", date, first_timeslot, reason);
            CutoffCheck::Skipped(reason)
        }
    }
}

fn evaluate(
    zone: &VenueZone,
    date: &str,
    first_timeslot: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CutoffCheck, SkipReason> {
    if date.trim().is_empty() {
        return Err(SkipReason::MissingDate);
    }
    let timeslot = first_timeslot
        .filter(|t| !t.trim().is_empty())
        .ok_or(SkipReason::MissingTimeslot)?;

    let day = parse_date(date).ok_or_else(|| SkipReason::InvalidDate(date.to_string()))?;
    let start = slot_start(timeslot).ok_or_else(|| SkipReason::InvalidTimeslot(timeslot.to_string()))?;
    let tz = zone
        .tz()
        .ok_or_else(|| SkipReason::UnknownZone(zone.name().to_string()))?;
    let slot_start = zone
        .local_instant(day, start)
        .ok_or_else(|| SkipReason::NonexistentLocalTime(format!("{} {}", date, start)))?;

    let earliest_allowed = now.with_timezone(&tz) + Duration::minutes(BOOKING_GRACE_MINUTES);
    if slot_start < earliest_allowed {
        return Ok(CutoffCheck::TooSoon {
            slot_start: slot_start.with_timezone(&slot_start.offset().fix()),
            earliest_allowed: earliest_allowed.with_timezone(&earliest_allowed.offset().fix()),
        });
    }
    Ok(CutoffCheck::Allowed)
}
