//! Wall clock and venue time zone.

use chrono::{DateTime, NaiveDate, NaiveTime, Offset, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

pub const DEFAULT_TIME_ZONE: &str = "Asia/Jakarta";

/// Source of "now", injectable for deterministic tests.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn from_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        let now = DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc);
        Ok(Self { now })
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }
}

/// The venue's configured time zone. An unknown name is kept (and reported)
/// but resolves to no zone data.
#[derive(Debug, Clone)]
pub struct VenueZone {
    name: String,
    tz: Option<Tz>,
}

/// "Now" as seen from the venue.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueNow {
    pub instant: DateTime<Utc>,
    pub iso: String,
    pub utc_offset_minutes: i32,
}

impl VenueZone {
    /// Resolves a zone name, falling back to [`DEFAULT_TIME_ZONE`] when unset.
    pub fn resolve(name: &str) -> Self {
        let name = match name.trim() {
            "" => DEFAULT_TIME_ZONE,
            trimmed => trimmed,
        };
        let tz = name.parse::<Tz>().ok();
        if tz.is_none() {
            warn!("Unknown venue time zone {:?}; cutoff checks will be skipped", name);
        }
        Self {
            name: name.to_string(),
            tz,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tz(&self) -> Option<Tz> {
        self.tz
    }

    /// Current venue time. Without zone data this reports UTC.
    pub fn now(&self, clock: &dyn Clock) -> VenueNow {
        let instant = clock.now_utc();
        match self.tz {
            Some(tz) => {
                let local = instant.with_timezone(&tz);
                VenueNow {
                    instant,
                    iso: local.to_rfc3339_opts(SecondsFormat::Secs, true),
                    utc_offset_minutes: local.offset().fix().local_minus_utc() / 60,
                }
            }
            None => VenueNow {
                instant,
                iso: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
                utc_offset_minutes: 0,
            },
        }
    }

    /// Wall-clock `date time` at the venue. `None` without zone data or when
    /// the local time does not exist (DST gap); ambiguous times take the
    /// earlier instant.
    pub fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
        let tz = self.tz?;
        tz.from_local_datetime(&date.and_time(time)).earliest()
    }
}

impl Default for VenueZone {
    fn default() -> Self {
        Self::resolve(DEFAULT_TIME_ZONE)
    }
}
