use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use charter_shared::{CharterKind, Location};

/// Field set for creating or editing a flight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightDraft {
    pub flight_number: String,
    pub tail_number: String,
    pub charter_kind: CharterKind,
    pub origin: Location,
    pub destination: Location,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub base_price: f64,
    pub total_seats: u32,
    pub available_seats: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelFlightRequest {
    pub flight_id: Uuid,
    pub note: String,
    pub flight_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RescheduleFlightRequest {
    pub flight_id: Uuid,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

/// Error body returned by the backing service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}
