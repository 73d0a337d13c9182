use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use charter_core::booking::{BookingReference, NewBooking};
use charter_core::delivery::TicketDelivery;
use charter_core::repository::{BookingRepository, FlightRepository, PassengerDirectory, PriceLookup};
use charter_core::requests::{CancelFlightRequest, FlightDraft, RescheduleFlightRequest};
use charter_core::search::{flight_number_key, PriceLookupResponse};
use charter_core::{RemoteError, RemoteResult};
use charter_shared::{
    CharterKind, Currency, Flight, FlightStatus, Location, PassengerSuggestion, TicketDocument,
};

const MAX_SUGGESTIONS: usize = 10;

#[derive(Default)]
struct Inner {
    flights: Vec<Flight>,
    passengers: Vec<PassengerSuggestion>,
    bookings: Vec<(BookingReference, NewBooking)>,
    deliveries: Vec<(String, TicketDocument)>,
}

/// In-process stand-in for the backing service.
///
/// Implements every collaborator trait so the console runs without the
/// remote service, and answers price lookups from its own flight list.
#[derive(Default)]
pub struct InMemoryBackend {
    inner: RwLock<Inner>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(flights: Vec<Flight>, passengers: Vec<PassengerSuggestion>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                flights,
                passengers,
                ..Default::default()
            }),
        }
    }

    /// A small schedule departing over the next days
    pub fn seeded() -> Self {
        let pap = || Location::new("PAP", "Toussaint Louverture", Some("Port-au-Prince".to_string()));
        let now = Utc::now();
        let flight = |number: &str, kind: CharterKind, destination: Location, days: i64, minutes: i64, price: f64, seats: u32| {
            let departure = now + Duration::days(days);
            Flight {
                id: Uuid::new_v4(),
                flight_number: number.to_string(),
                tail_number: match kind {
                    CharterKind::Helicopter => "HH-HEL".to_string(),
                    CharterKind::Plane => "HH-PLN".to_string(),
                },
                charter_kind: kind,
                origin: pap(),
                destination,
                departure,
                arrival: departure + Duration::minutes(minutes),
                base_price: price,
                total_seats: seats,
                available_seats: seats,
                status: FlightStatus::Scheduled,
                cancellation_note: None,
                updated_at: now,
            }
        };

        let mut flights = vec![
            flight("HC204", CharterKind::Helicopter, Location::new("JAK", "Jacmel", None), 2, 35, 189.0, 5),
            flight("PL310", CharterKind::Plane, Location::new("CAP", "Hugo Chavez", Some("Cap-Haïtien".to_string())), 3, 50, 245.0, 12),
        ];
        // Return legs fly the other way
        let mut back = flight("HC205", CharterKind::Helicopter, pap(), 5, 35, 150.0, 5);
        back.origin = Location::new("JAK", "Jacmel", None);
        flights.push(back);

        let passengers = vec![PassengerSuggestion {
            id: "p-1".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Baptiste".to_string(),
            email: Some("jean.baptiste@example.com".to_string()),
            phone: Some("+509 3700 0000".to_string()),
            nationality: Some("HT".to_string()),
            date_of_birth: None,
            id_number: None,
        }];

        Self::with_data(flights, passengers)
    }

    pub async fn bookings(&self) -> Vec<(BookingReference, NewBooking)> {
        self.inner.read().await.bookings.clone()
    }

    pub async fn deliveries(&self) -> Vec<(String, TicketDocument)> {
        self.inner.read().await.deliveries.clone()
    }
}

fn apply_draft(flight: &mut Flight, draft: &FlightDraft) {
    flight.flight_number = draft.flight_number.trim().to_string();
    flight.tail_number = draft.tail_number.trim().to_string();
    flight.charter_kind = draft.charter_kind;
    flight.origin = draft.origin.clone();
    flight.destination = draft.destination.clone();
    flight.departure = draft.departure;
    flight.arrival = draft.arrival;
    flight.base_price = draft.base_price;
    flight.total_seats = draft.total_seats;
    flight.available_seats = draft.available_seats;
    flight.updated_at = Utc::now();
}

#[async_trait]
impl FlightRepository for InMemoryBackend {
    async fn list_flights(&self) -> RemoteResult<Vec<Flight>> {
        let mut flights = self.inner.read().await.flights.clone();
        flights.sort_by_key(|f| f.departure);
        Ok(flights)
    }

    async fn get_flight(&self, id: Uuid) -> RemoteResult<Flight> {
        self.inner
            .read()
            .await
            .flights
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn create_flight(&self, draft: &FlightDraft) -> RemoteResult<Flight> {
        let mut inner = self.inner.write().await;
        let key = flight_number_key(&draft.flight_number);
        if inner.flights.iter().any(|f| flight_number_key(&f.flight_number) == key) {
            return Err(RemoteError::rejected(409, format!("Flight number {} already exists", key)));
        }

        let mut flight = Flight {
            id: Uuid::new_v4(),
            flight_number: String::new(),
            tail_number: String::new(),
            charter_kind: draft.charter_kind,
            origin: draft.origin.clone(),
            destination: draft.destination.clone(),
            departure: draft.departure,
            arrival: draft.arrival,
            base_price: draft.base_price,
            total_seats: draft.total_seats,
            available_seats: draft.available_seats,
            status: FlightStatus::Scheduled,
            cancellation_note: None,
            updated_at: Utc::now(),
        };
        apply_draft(&mut flight, draft);
        inner.flights.push(flight.clone());
        Ok(flight)
    }

    async fn update_flight(&self, id: Uuid, draft: &FlightDraft) -> RemoteResult<Flight> {
        let mut inner = self.inner.write().await;
        let flight = inner.flights.iter_mut().find(|f| f.id == id).ok_or(RemoteError::NotFound)?;
        if flight.is_cancelled() {
            return Err(RemoteError::rejected(409, "Cancelled flights cannot be edited"));
        }
        apply_draft(flight, draft);
        Ok(flight.clone())
    }

    async fn cancel_flight(&self, request: &CancelFlightRequest) -> RemoteResult<()> {
        let mut inner = self.inner.write().await;
        let flight = inner
            .flights
            .iter_mut()
            .find(|f| f.id == request.flight_id)
            .ok_or(RemoteError::NotFound)?;
        flight.cancel(request.note.clone());
        Ok(())
    }

    async fn reschedule_flight(&self, request: &RescheduleFlightRequest) -> RemoteResult<()> {
        let mut inner = self.inner.write().await;
        let flight = inner
            .flights
            .iter_mut()
            .find(|f| f.id == request.flight_id)
            .ok_or(RemoteError::NotFound)?;
        if flight.is_cancelled() {
            return Err(RemoteError::rejected(409, "Cancelled flights cannot be rescheduled"));
        }
        flight.reschedule(request.departure, request.arrival);
        Ok(())
    }

    async fn delete_flight(&self, id: Uuid) -> RemoteResult<()> {
        let mut inner = self.inner.write().await;
        let before = inner.flights.len();
        inner.flights.retain(|f| f.id != id);
        if inner.flights.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PriceLookup for InMemoryBackend {
    async fn lookup_price(&self, flight_number: &str) -> RemoteResult<PriceLookupResponse> {
        let key = flight_number_key(flight_number);
        let inner = self.inner.read().await;
        let flight = inner
            .flights
            .iter()
            .filter(|f| !f.is_cancelled())
            .find(|f| flight_number_key(&f.flight_number) == key)
            .ok_or(RemoteError::NotFound)?;

        Ok(PriceLookupResponse {
            success: true,
            price: Some(serde_json::json!(flight.base_price)),
            currency: Some(Currency::REFERENCE.code().to_string()),
        })
    }
}

#[async_trait]
impl PassengerDirectory for InMemoryBackend {
    async fn search_passengers(&self, partial_name: &str) -> RemoteResult<Vec<PassengerSuggestion>> {
        let needle = partial_name.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .passengers
            .iter()
            .filter(|p| {
                p.first_name.to_lowercase().starts_with(&needle)
                    || p.last_name.to_lowercase().starts_with(&needle)
                    || format!("{} {}", p.first_name, p.last_name).to_lowercase().starts_with(&needle)
            })
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBackend {
    async fn create_booking(&self, booking: &NewBooking) -> RemoteResult<BookingReference> {
        let mut inner = self.inner.write().await;
        let flight = inner
            .flights
            .iter_mut()
            .find(|f| f.id == booking.flight_id)
            .ok_or(RemoteError::NotFound)?;
        if flight.is_cancelled() || flight.available_seats == 0 {
            return Err(RemoteError::rejected(409, "This flight is no longer available"));
        }
        flight.available_seats -= 1;

        let short = booking_code();
        let reference = BookingReference(format!("CHR-{}", short));
        inner.bookings.push((reference.clone(), booking.clone()));

        // Remember who booked so autocomplete finds them next time
        let p = &booking.passenger;
        let known = inner.passengers.iter().any(|s| {
            s.first_name.eq_ignore_ascii_case(&p.first_name) && s.last_name.eq_ignore_ascii_case(&p.last_name)
        });
        if !known {
            let id = format!("p-{}", inner.passengers.len() + 1);
            inner.passengers.push(PassengerSuggestion {
                id,
                first_name: p.first_name.trim().to_string(),
                last_name: p.last_name.trim().to_string(),
                email: p.email.as_ref().map(|e| e.expose().clone()),
                phone: p.phone.as_ref().map(|v| v.expose().clone()),
                nationality: p.nationality.clone(),
                date_of_birth: p.date_of_birth,
                id_number: p.id_number.as_ref().map(|v| v.expose().clone()),
            });
        }
        Ok(reference)
    }
}

fn booking_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

#[async_trait]
impl TicketDelivery for InMemoryBackend {
    async fn deliver(&self, ticket: &TicketDocument, recipient: &str) -> RemoteResult<()> {
        info!(booking_reference = %ticket.booking_reference, "E-ticket stored for in-memory delivery");
        self.inner
            .write()
            .await
            .deliveries
            .push((recipient.to_string(), ticket.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_core::payment::PaymentMethod;
    use charter_shared::{LegPrice, Masked, Passenger};

    #[tokio::test]
    async fn test_price_lookup_matches_normalized_number() {
        let backend = InMemoryBackend::seeded();
        let resp = backend.lookup_price(" hc205 ").await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.price, Some(serde_json::json!(150.0)));
        assert_eq!(resp.currency.as_deref(), Some("USD"));

        assert_eq!(backend.lookup_price("ZZ999").await.unwrap_err(), RemoteError::NotFound);
    }

    #[tokio::test]
    async fn test_cancelled_flight_has_no_price() {
        let backend = InMemoryBackend::seeded();
        let flights = backend.list_flights().await.unwrap();
        let hc205 = flights.iter().find(|f| f.flight_number == "HC205").unwrap();
        backend
            .cancel_flight(&CancelFlightRequest {
                flight_id: hc205.id,
                note: "Maintenance".to_string(),
                flight_number: hc205.flight_number.clone(),
            })
            .await
            .unwrap();

        assert_eq!(backend.lookup_price("HC205").await.unwrap_err(), RemoteError::NotFound);
        let kept = backend.get_flight(hc205.id).await.unwrap();
        assert_eq!(kept.status, FlightStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_booking_takes_a_seat_and_learns_passenger() {
        let backend = InMemoryBackend::seeded();
        let flight = backend.list_flights().await.unwrap().remove(0);
        let booking = NewBooking {
            flight_id: flight.id,
            passenger: Passenger {
                first_name: "Marie".to_string(),
                last_name: "Joseph".to_string(),
                email: Some(Masked("marie@example.com".to_string())),
                ..Default::default()
            },
            outbound: LegPrice::reference(flight.base_price),
            return_leg: None,
            payment: PaymentMethod::Card,
            total: flight.base_price,
            currency: Currency::Usd,
        };

        let reference = backend.create_booking(&booking).await.unwrap();
        assert!(reference.0.starts_with("CHR-"));
        let after = backend.get_flight(flight.id).await.unwrap();
        assert_eq!(after.available_seats, flight.available_seats - 1);

        let found = backend.search_passengers("mar").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email.as_deref(), Some("marie@example.com"));
    }

    #[tokio::test]
    async fn test_delete_unknown_flight_is_not_found() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.delete_flight(Uuid::new_v4()).await.unwrap_err(), RemoteError::NotFound);
    }
}
