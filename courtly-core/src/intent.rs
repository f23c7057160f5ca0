use std::collections::BTreeMap;

use crate::catalog::{is_known_timeslot, parse_date, parse_timeslot_csv};
use crate::{CoreError, CoreResult};

/// Provider session metadata, string to string.
pub type Metadata = BTreeMap<String, String>;

pub const META_DATE: &str = "date";
pub const META_TIMESLOTS: &str = "timeslots";
pub const META_COURT_ID: &str = "courtId";
/// Single-slot key written by older sessions.
pub const META_LEGACY_TIMESLOT: &str = "timeslotId";

/// What the customer is trying to book. Carried across the payment redirect
/// as session metadata; nothing is stored locally until confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutIntent {
    pub date: String,
    pub court_id: String,
    pub timeslots: Vec<String>,
}

impl CheckoutIntent {
    /// Builds an intent from client input. Checks run in order: court id,
    /// timeslot list, date format, catalog membership. Repeated slots are
    /// collapsed, keeping first occurrence order.
    pub fn validated(date: &str, court_id: &str, timeslots: &[String]) -> CoreResult<Self> {
        let court_id = court_id.trim();
        if court_id.is_empty() {
            return Err(CoreError::validation("missing courtId"));
        }

        let mut slots: Vec<String> = Vec::with_capacity(timeslots.len());
        for slot in timeslots.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if !slots.iter().any(|s| s == slot) {
                slots.push(slot.to_string());
            }
        }
        if slots.is_empty() {
            return Err(CoreError::validation("missing timeslots"));
        }

        let date = date.trim();
        if date.is_empty() {
            return Err(CoreError::validation("missing date"));
        }
        if parse_date(date).is_none() {
            return Err(CoreError::validation(format!("invalid date {:?}, expected YYYY-MM-DD", date)));
        }
        if let Some(unknown) = slots.iter().find(|s| !is_known_timeslot(s)) {
            return Err(CoreError::validation(format!("unknown timeslot {:?}", unknown)));
        }

        Ok(Self {
            date: date.to_string(),
            court_id: court_id.to_string(),
            timeslots: slots,
        })
    }

    /// Reads an intent back from session metadata. The list key wins; the
    /// legacy single-slot key is used when the list is absent or empty.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let get = |key: &str| metadata.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let mut timeslots = parse_timeslot_csv(&get(META_TIMESLOTS));
        if timeslots.is_empty() {
            let legacy = get(META_LEGACY_TIMESLOT);
            if !legacy.is_empty() {
                timeslots.push(legacy);
            }
        }

        Self {
            date: get(META_DATE),
            court_id: get(META_COURT_ID),
            timeslots,
        }
    }

    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(META_DATE.to_string(), self.date.clone());
        metadata.insert(META_TIMESLOTS.to_string(), self.timeslots.join(","));
        metadata.insert(META_COURT_ID.to_string(), self.court_id.clone());
        metadata
    }

    pub fn first_timeslot(&self) -> Option<&str> {
        self.timeslots.first().map(String::as_str)
    }

    /// Human-readable summary shown on the provider's payment page.
    pub fn description(&self) -> String {
        format!("{} [{}] - {}", self.date, self.timeslots.join(", "), self.court_id)
    }
}
