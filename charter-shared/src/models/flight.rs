use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Fixed-wing or rotary-wing capacity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CharterKind {
    Plane,
    Helicopter,
}

/// Lifecycle status of a flight record.
///
/// `Rescheduled` is still a scheduled flight whose timing fields changed.
/// Deleted flights have no status: the record is gone from the list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
}

impl FlightStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, FlightStatus::Scheduled | FlightStatus::Rescheduled)
    }
}

/// Airport, helipad or landing zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub code: String,
    pub name: String,
    pub city: Option<String>,
}

impl Location {
    pub fn new(code: impl Into<String>, name: impl Into<String>, city: Option<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            city,
        }
    }

    /// "Cap-Haïtien (CAP)" style label used by tickets and the dashboard
    pub fn display(&self) -> String {
        match &self.city {
            Some(city) if !city.is_empty() => format!("{} - {} ({})", city, self.name, self.code),
            _ => format!("{} ({})", self.name, self.code),
        }
    }
}

/// A schedulable unit of charter capacity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub tail_number: String,
    pub charter_kind: CharterKind,
    pub origin: Location,
    pub destination: Location,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    /// Currency-less fare, resolved against the settlement currency at booking time
    pub base_price: f64,
    pub total_seats: u32,
    pub available_seats: u32,
    pub status: FlightStatus,
    pub cancellation_note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Flight {
    pub fn is_cancelled(&self) -> bool {
        self.status == FlightStatus::Cancelled
    }

    /// Mark as cancelled (records are kept for audits)
    pub fn cancel(&mut self, note: String) {
        self.status = FlightStatus::Cancelled;
        self.cancellation_note = Some(note);
        self.updated_at = Utc::now();
    }

    pub fn reschedule(&mut self, departure: DateTime<Utc>, arrival: DateTime<Utc>) {
        self.departure = departure;
        self.arrival = arrival;
        self.status = FlightStatus::Rescheduled;
        self.updated_at = Utc::now();
    }
}
