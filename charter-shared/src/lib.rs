pub mod models;
pub mod pii;

pub use models::events::FlightEvent;
pub use models::flight::{CharterKind, Flight, FlightStatus, Location};
pub use models::money::{Currency, LegPrice};
pub use models::passenger::{Passenger, PassengerSuggestion};
pub use models::ticket::{ItineraryLeg, Localized, PaymentSummary, RosterEntry, TicketDocument, TripKind};
pub use pii::Masked;
