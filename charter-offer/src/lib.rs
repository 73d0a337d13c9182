pub mod draft;
pub mod resolver;
pub mod rules;
pub mod suggestions;

pub use draft::{BookingDraft, PassengerField};
pub use resolver::{ResolverConfig, ResolverEvent, ResolverOutcome, ResolverState, ReturnLegResolver};
pub use rules::{finalize, submission_blockers, DraftError};
pub use suggestions::{SuggestionCache, SuggestionConfig, SuggestionEvent, SuggestionOutcome};

/// Monotonic tag identifying one keystroke's work; stale tags are dropped
pub type Generation = u64;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, Utc};
    use charter_shared::{CharterKind, Flight, FlightStatus, Location};
    use uuid::Uuid;

    pub(crate) fn flight(base_price: f64) -> Flight {
        let departure = Utc::now() + Duration::days(3);
        Flight {
            id: Uuid::new_v4(),
            flight_number: "HC204".to_string(),
            tail_number: "HH-CHR".to_string(),
            charter_kind: CharterKind::Helicopter,
            origin: Location::new("PAP", "Toussaint Louverture", None),
            destination: Location::new("JAK", "Jacmel", None),
            departure,
            arrival: departure + Duration::minutes(35),
            base_price,
            total_seats: 5,
            available_seats: 5,
            status: FlightStatus::Scheduled,
            cancellation_note: None,
            updated_at: Utc::now(),
        }
    }
}
