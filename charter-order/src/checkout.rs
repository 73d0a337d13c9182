use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{error, info};
use charter_core::booking::{Booking, BookingReference};
use charter_core::delivery::TicketDelivery;
use charter_core::repository::BookingRepository;
use charter_core::{RemoteError, GENERIC_FAILURE};
use charter_offer::{finalize, BookingDraft, DraftError};
use charter_shared::{FlightEvent, TicketDocument};
use crate::ticket::TicketAssembler;

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Booking could not be saved: {0}")]
    Persist(#[source] RemoteError),

    /// The booking exists; only the e-ticket failed to go out
    #[error("Booking {reference} was saved but the e-ticket could not be delivered: {source}")]
    Delivery {
        reference: BookingReference,
        #[source]
        source: RemoteError,
    },
}

impl CheckoutError {
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Draft(e) => e.to_string(),
            CheckoutError::Persist(e) => e.user_message(GENERIC_FAILURE),
            CheckoutError::Delivery { reference, source } => format!(
                "Booking {} is confirmed, but the e-ticket was not sent: {}",
                reference,
                source.user_message("delivery failed")
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub reference: BookingReference,
    pub ticket: TicketDocument,
    pub recipient: String,
}

/// Persist, assemble, deliver. Nothing after a failed step runs.
pub struct Checkout {
    bookings: Arc<dyn BookingRepository>,
    delivery: Arc<dyn TicketDelivery>,
    assembler: TicketAssembler,
    events: broadcast::Sender<FlightEvent>,
}

impl Checkout {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        delivery: Arc<dyn TicketDelivery>,
        assembler: TicketAssembler,
        events: broadcast::Sender<FlightEvent>,
    ) -> Self {
        Self {
            bookings,
            delivery,
            assembler,
            events,
        }
    }

    pub async fn submit(&self, draft: &BookingDraft, now: DateTime<Utc>) -> Result<CheckoutReceipt, CheckoutError> {
        let details = finalize(draft, now)?;
        // finalize guarantees an address
        let recipient = details.passenger.email_address().unwrap_or_default().to_string();

        let reference = self.bookings.create_booking(&details).await.map_err(|e| {
            error!(flight_id = %details.flight_id, "Booking persistence failed: {}", e);
            CheckoutError::Persist(e)
        })?;
        info!(booking_reference = %reference, flight_id = %details.flight_id, total = details.total, "Booking confirmed");

        let booking = Booking {
            reference: reference.clone(),
            flight: draft.flight().clone(),
            details,
            created_at: now,
        };
        let _ = self.events.send(FlightEvent::BookingConfirmed {
            flight_id: booking.flight.id,
            booking_reference: reference.to_string(),
        });

        let ticket = self.assembler.assemble(&booking);
        if let Err(source) = self.delivery.deliver(&ticket, &recipient).await {
            error!(booking_reference = %reference, "E-ticket delivery failed: {}", source);
            return Err(CheckoutError::Delivery { reference, source });
        }

        Ok(CheckoutReceipt {
            reference,
            ticket,
            recipient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use charter_catalog::OperationalClock;
    use charter_core::booking::NewBooking;
    use charter_core::RemoteResult;
    use charter_offer::PassengerField;
    use charter_shared::CharterKind;
    use crate::test_support::flight;
    use crate::ticket::CompanyProfile;

    #[derive(Default)]
    struct MockBookings {
        saved: Mutex<Vec<NewBooking>>,
        fail: bool,
    }

    #[async_trait]
    impl BookingRepository for MockBookings {
        async fn create_booking(&self, booking: &NewBooking) -> RemoteResult<BookingReference> {
            if self.fail {
                return Err(RemoteError::rejected(422, "Flight is full"));
            }
            let mut saved = self.saved.lock().unwrap();
            saved.push(booking.clone());
            Ok(BookingReference(format!("CHR-{:04}", saved.len())))
        }
    }

    #[derive(Default)]
    struct MockDelivery {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl TicketDelivery for MockDelivery {
        async fn deliver(&self, ticket: &TicketDocument, recipient: &str) -> RemoteResult<()> {
            if self.fail {
                return Err(RemoteError::Transport("smtp timeout".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((ticket.booking_reference.clone(), recipient.to_string()));
            Ok(())
        }
    }

    fn checkout(bookings: Arc<MockBookings>, delivery: Arc<MockDelivery>) -> Checkout {
        let (tx, _) = broadcast::channel(8);
        let assembler = TicketAssembler::new(
            OperationalClock::default(),
            CompanyProfile {
                name: "Caribbean Charter Co.".to_string(),
                support_phone: "+509 2813 0000".to_string(),
                support_email: "ops@charter.example".to_string(),
            },
        );
        Checkout::new(bookings, delivery, assembler, tx)
    }

    fn ready_draft() -> BookingDraft {
        let mut draft = BookingDraft::new(flight("HC204", CharterKind::Helicopter));
        draft.set_passenger_field(PassengerField::FirstName, "Marie");
        draft.set_passenger_field(PassengerField::LastName, "Joseph");
        draft.set_passenger_field(PassengerField::Email, "marie@example.com");
        draft.set_passenger_field(PassengerField::Phone, "+509 3600 1111");
        draft
    }

    #[tokio::test]
    async fn test_submit_persists_and_delivers() {
        let bookings = Arc::new(MockBookings::default());
        let delivery = Arc::new(MockDelivery::default());
        let receipt = checkout(bookings.clone(), delivery.clone())
            .submit(&ready_draft(), Utc::now())
            .await
            .unwrap();

        assert_eq!(receipt.reference, BookingReference("CHR-0001".to_string()));
        assert_eq!(receipt.ticket.booking_reference, "CHR-0001");
        assert_eq!(bookings.saved.lock().unwrap().len(), 1);
        assert_eq!(
            delivery.sent.lock().unwrap().clone(),
            vec![("CHR-0001".to_string(), "marie@example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn test_incomplete_draft_never_reaches_collaborators() {
        let bookings = Arc::new(MockBookings::default());
        let delivery = Arc::new(MockDelivery::default());
        let draft = BookingDraft::new(flight("HC204", CharterKind::Helicopter));

        let err = checkout(bookings.clone(), delivery.clone())
            .submit(&draft, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Draft(_)));
        assert!(bookings.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_skips_delivery() {
        let bookings = Arc::new(MockBookings { fail: true, ..Default::default() });
        let delivery = Arc::new(MockDelivery::default());

        let err = checkout(bookings, delivery.clone())
            .submit(&ready_draft(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Flight is full");
        assert!(delivery.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_not_success() {
        let bookings = Arc::new(MockBookings::default());
        let delivery = Arc::new(MockDelivery { fail: true, ..Default::default() });

        let err = checkout(bookings, delivery)
            .submit(&ready_draft(), Utc::now())
            .await
            .unwrap_err();
        match &err {
            CheckoutError::Delivery { reference, .. } => assert_eq!(reference.0, "CHR-0001"),
            other => panic!("expected delivery failure, got {:?}", other),
        }
        assert!(err.user_message().contains("CHR-0001"));
        assert!(!err.user_message().contains("smtp"));
    }
}
