use uuid::Uuid;

/// Facts pushed to the operations dashboard after a change lands.
/// Informational only: dashboards refetch the list for authoritative data.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlightEvent {
    FlightCreated {
        flight_id: Uuid,
        flight_number: String,
    },
    FlightUpdated {
        flight_id: Uuid,
    },
    FlightCancelled {
        flight_id: Uuid,
        flight_number: String,
    },
    FlightRescheduled {
        flight_id: Uuid,
        departure: i64,
        arrival: i64,
    },
    FlightDeleted {
        flight_id: Uuid,
    },
    BookingConfirmed {
        flight_id: Uuid,
        booking_reference: String,
    },
}

impl FlightEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlightEvent::FlightCreated { .. } => "flight_created",
            FlightEvent::FlightUpdated { .. } => "flight_updated",
            FlightEvent::FlightCancelled { .. } => "flight_cancelled",
            FlightEvent::FlightRescheduled { .. } => "flight_rescheduled",
            FlightEvent::FlightDeleted { .. } => "flight_deleted",
            FlightEvent::BookingConfirmed { .. } => "booking_confirmed",
        }
    }

    pub fn flight_id(&self) -> Uuid {
        match self {
            FlightEvent::FlightCreated { flight_id, .. }
            | FlightEvent::FlightUpdated { flight_id }
            | FlightEvent::FlightCancelled { flight_id, .. }
            | FlightEvent::FlightRescheduled { flight_id, .. }
            | FlightEvent::FlightDeleted { flight_id }
            | FlightEvent::BookingConfirmed { flight_id, .. } => *flight_id,
        }
    }
}
