use chrono::{DateTime, Utc};
use charter_shared::Flight;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InventoryError {
    #[error("Flight {0} is cancelled and no longer accepts bookings")]
    Cancelled(String),

    #[error("Flight {0} has already departed")]
    Departed(String),

    #[error("Insufficient seats on {flight_number}: requested {requested}, available {available}")]
    InsufficientSeats {
        flight_number: String,
        requested: u32,
        available: u32,
    },
}

/// Whether `flight` can take `seats` more passengers at `now`.
/// Cancelled flights stay readable but never bookable.
pub fn ensure_bookable(flight: &Flight, seats: u32, now: DateTime<Utc>) -> Result<(), InventoryError> {
    if flight.is_cancelled() {
        return Err(InventoryError::Cancelled(flight.flight_number.clone()));
    }
    if flight.departure <= now {
        return Err(InventoryError::Departed(flight.flight_number.clone()));
    }
    if flight.available_seats < seats {
        return Err(InventoryError::InsufficientSeats {
            flight_number: flight.flight_number.clone(),
            requested: seats,
            available: flight.available_seats,
        });
    }
    Ok(())
}
