use async_trait::async_trait;
use uuid::Uuid;
use charter_shared::{Flight, PassengerSuggestion};
use crate::booking::{BookingReference, NewBooking};
use crate::requests::{CancelFlightRequest, FlightDraft, RescheduleFlightRequest};
use crate::search::PriceLookupResponse;
use crate::RemoteResult;

/// Flight inventory held by the backing service (source of truth)
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn list_flights(&self) -> RemoteResult<Vec<Flight>>;

    async fn get_flight(&self, id: Uuid) -> RemoteResult<Flight>;

    async fn create_flight(&self, draft: &FlightDraft) -> RemoteResult<Flight>;

    async fn update_flight(&self, id: Uuid, draft: &FlightDraft) -> RemoteResult<Flight>;

    /// May cascade to dependent bookings on the service side
    async fn cancel_flight(&self, request: &CancelFlightRequest) -> RemoteResult<()>;

    async fn reschedule_flight(&self, request: &RescheduleFlightRequest) -> RemoteResult<()>;

    /// Irreversible
    async fn delete_flight(&self, id: Uuid) -> RemoteResult<()>;
}

/// Price lookup keyed by a free-text flight number.
/// Unknown flight numbers answer `RemoteError::NotFound`.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn lookup_price(&self, flight_number: &str) -> RemoteResult<PriceLookupResponse>;
}

/// Passenger search for name autocomplete
#[async_trait]
pub trait PassengerDirectory: Send + Sync {
    async fn search_passengers(&self, partial_name: &str) -> RemoteResult<Vec<PassengerSuggestion>>;
}

/// Booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &NewBooking) -> RemoteResult<BookingReference>;
}
