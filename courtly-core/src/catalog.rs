use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// First bookable hour of the day.
pub const OPENING_HOUR: u32 = 8;
/// The last slot ends at this hour.
pub const CLOSING_HOUR: u32 = 22;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fixed one-hour booking window. Generated, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeslot {
    pub id: String,
    pub label: String,
}

/// A bookable court, either from the seed list or from the `courts` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Court {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price_per_hour: None,
            active: true,
        }
    }
}

/// The daily schedule: one slot per hour, 08:00 to 22:00.
pub fn generate_timeslots() -> Vec<Timeslot> {
    (OPENING_HOUR..CLOSING_HOUR)
        .map(|hour| Timeslot {
            id: format!("{:02}:00-{:02}:00", hour, hour + 1),
            label: format!("{:02}:00 - {:02}:00", hour, hour + 1),
        })
        .collect()
}

pub fn is_known_timeslot(id: &str) -> bool {
    generate_timeslots().iter().any(|slot| slot.id == id)
}

/// Courts served when the store has none configured.
pub fn seed_courts() -> Vec<Court> {
    (1..=4)
        .map(|n| Court::new(format!("court-{}", n), format!("Court {}", n)))
        .collect()
}

/// Start time of a slot identifier: the `HH:MM` part before the dash.
pub fn slot_start(timeslot_id: &str) -> Option<NaiveTime> {
    let start = timeslot_id.split('-').next()?.trim();
    NaiveTime::parse_from_str(start, "%H:%M").ok()
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Splits a comma-separated timeslot list, trimming entries and dropping blanks.
pub fn parse_timeslot_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
