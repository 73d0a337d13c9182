use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use charter_shared::{Currency, Flight, LegPrice, Passenger};
use crate::payment::PaymentMethod;

/// Return segment keyed on an operator-assigned flight number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnLeg {
    pub flight_number: String,
    pub departure_date: Option<NaiveDate>,
    pub price: LegPrice,
}

/// Finalized booking-draft fields, as accepted by the booking collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub flight_id: Uuid,
    pub passenger: Passenger,
    pub outbound: LegPrice,
    pub return_leg: Option<ReturnLeg>,
    pub payment: PaymentMethod,
    pub total: f64,
    pub currency: Currency,
}

impl NewBooking {
    /// Round trip only when a return leg carries a non-empty flight number
    pub fn is_round_trip(&self) -> bool {
        self.return_leg
            .as_ref()
            .map(|leg| !leg.flight_number.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BookingReference(pub String);

impl std::fmt::Display for BookingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted booking together with the flight snapshot it was sold on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub reference: BookingReference,
    pub flight: Flight,
    pub details: NewBooking,
    pub created_at: DateTime<Utc>,
}
