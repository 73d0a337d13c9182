pub mod checkout;
pub mod lifecycle;
pub mod notices;
pub mod ticket;

pub use checkout::{Checkout, CheckoutError, CheckoutReceipt};
pub use lifecycle::{FlightLifecycle, LifecycleConfig, LifecycleError};
pub use ticket::{CompanyProfile, TicketAssembler};

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;
    use uuid::Uuid;
    use charter_core::repository::FlightRepository;
    use charter_core::requests::{CancelFlightRequest, FlightDraft, RescheduleFlightRequest};
    use charter_core::{RemoteError, RemoteResult};
    use charter_shared::{CharterKind, Flight, FlightStatus, Location};

    pub(crate) fn flight(number: &str, kind: CharterKind) -> Flight {
        let departure = Utc::now() + Duration::days(4);
        Flight {
            id: Uuid::new_v4(),
            flight_number: number.to_string(),
            tail_number: "HH-CHR".to_string(),
            charter_kind: kind,
            origin: Location::new("PAP", "Toussaint Louverture", Some("Port-au-Prince".to_string())),
            destination: Location::new("JAK", "Jacmel", None),
            departure,
            arrival: departure + Duration::minutes(35),
            base_price: 189.0,
            total_seats: 5,
            available_seats: 5,
            status: FlightStatus::Scheduled,
            cancellation_note: None,
            updated_at: Utc::now(),
        }
    }

    /// Flight store that records every call and can be told to fail
    #[derive(Default)]
    pub(crate) struct RecordingRepo {
        pub(crate) flights: Mutex<Vec<Flight>>,
        pub(crate) calls: Mutex<Vec<&'static str>>,
        pub(crate) fail_with: Mutex<Option<RemoteError>>,
    }

    impl RecordingRepo {
        pub(crate) fn with(flights: Vec<Flight>) -> Self {
            Self {
                flights: Mutex::new(flights),
                ..Default::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn fail_next(&self, err: RemoteError) {
            *self.fail_with.lock().unwrap() = Some(err);
        }

        fn record(&self, call: &'static str) -> RemoteResult<()> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl FlightRepository for RecordingRepo {
        async fn list_flights(&self) -> RemoteResult<Vec<Flight>> {
            self.calls.lock().unwrap().push("list");
            Ok(self.flights.lock().unwrap().clone())
        }

        async fn get_flight(&self, id: Uuid) -> RemoteResult<Flight> {
            self.calls.lock().unwrap().push("get");
            self.flights
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == id)
                .cloned()
                .ok_or(RemoteError::NotFound)
        }

        async fn create_flight(&self, draft: &FlightDraft) -> RemoteResult<Flight> {
            self.record("create")?;
            let mut flight = flight(&draft.flight_number, draft.charter_kind);
            flight.departure = draft.departure;
            flight.arrival = draft.arrival;
            self.flights.lock().unwrap().push(flight.clone());
            Ok(flight)
        }

        async fn update_flight(&self, id: Uuid, draft: &FlightDraft) -> RemoteResult<Flight> {
            self.record("update")?;
            let mut flights = self.flights.lock().unwrap();
            let flight = flights.iter_mut().find(|f| f.id == id).ok_or(RemoteError::NotFound)?;
            flight.base_price = draft.base_price;
            flight.total_seats = draft.total_seats;
            flight.available_seats = draft.available_seats;
            Ok(flight.clone())
        }

        async fn cancel_flight(&self, request: &CancelFlightRequest) -> RemoteResult<()> {
            self.record("cancel")?;
            if let Some(f) = self.flights.lock().unwrap().iter_mut().find(|f| f.id == request.flight_id) {
                f.cancel(request.note.clone());
            }
            Ok(())
        }

        async fn reschedule_flight(&self, request: &RescheduleFlightRequest) -> RemoteResult<()> {
            self.record("reschedule")?;
            if let Some(f) = self.flights.lock().unwrap().iter_mut().find(|f| f.id == request.flight_id) {
                f.reschedule(request.departure, request.arrival);
            }
            Ok(())
        }

        async fn delete_flight(&self, id: Uuid) -> RemoteResult<()> {
            self.record("delete")?;
            self.flights.lock().unwrap().retain(|f| f.id != id);
            Ok(())
        }
    }
}
