use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::pii::Masked;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Paid,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(ReservationStatus::Paid),
            other => Err(format!("unknown reservation status {:?}", other)),
        }
    }
}

/// The occupancy key. At most one paid reservation exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotKey {
    pub date: String,
    pub timeslot_id: String,
    pub court_id: String,
}

impl SlotKey {
    pub fn new(date: impl Into<String>, timeslot_id: impl Into<String>, court_id: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            timeslot_id: timeslot_id.into(),
            court_id: court_id.into(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.timeslot_id, self.court_id)
    }
}

/// A reservation about to be written; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub key: SlotKey,
    pub user_email: Masked<String>,
    /// Minor units; this record's share of the amount paid.
    pub amount: i64,
    pub status: ReservationStatus,
    /// Unix seconds.
    pub created_at: i64,
    pub payment_ref: String,
}

/// A persisted reservation. Written once at confirmation, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub date: String,
    pub timeslot_id: String,
    pub court_id: String,
    pub user_email: Masked<String>,
    pub amount: i64,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub payment_ref: String,
}

impl Reservation {
    pub fn from_new(id: Uuid, new: &NewReservation) -> Self {
        Self {
            id,
            date: new.key.date.clone(),
            timeslot_id: new.key.timeslot_id.clone(),
            court_id: new.key.court_id.clone(),
            user_email: new.user_email.clone(),
            amount: new.amount,
            status: new.status,
            created_at: new.created_at,
            payment_ref: new.payment_ref.clone(),
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.date.clone(), self.timeslot_id.clone(), self.court_id.clone())
    }
}

/// Splits the amount paid for a booking across its per-slot records.
/// Shares are equal; the remainder goes to the first record so the shares
/// always sum to `total`.
pub fn split_amount(total: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let share = total / n;
    let remainder = total - share * n;

    let mut shares = vec![share; parts];
    shares[0] += remainder;
    shares
}
