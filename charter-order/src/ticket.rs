use serde::{Deserialize, Serialize};
use charter_catalog::pricing::format_amount;
use charter_catalog::OperationalClock;
use charter_core::booking::Booking;
use charter_shared::{ItineraryLeg, Localized, PaymentSummary, RosterEntry, TicketDocument, TripKind};
use crate::notices;

/// Operator details printed on every ticket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyProfile {
    pub name: String,
    pub support_phone: String,
    pub support_email: String,
}

/// Builds e-ticket content from a persisted booking.
///
/// Holds no mutable state: the same booking always yields the same document.
/// Dates and times are rendered in the operational time zone.
#[derive(Debug, Clone)]
pub struct TicketAssembler {
    clock: OperationalClock,
    company: CompanyProfile,
}

impl TicketAssembler {
    pub fn new(clock: OperationalClock, company: CompanyProfile) -> Self {
        Self { clock, company }
    }

    pub fn assemble(&self, booking: &Booking) -> TicketDocument {
        let flight = &booking.flight;
        let details = &booking.details;
        let trip = if details.is_round_trip() {
            TripKind::RoundTrip
        } else {
            TripKind::OneWay
        };

        let mut itinerary = vec![ItineraryLeg {
            direction: notices::outbound_label(),
            flight_number: flight.flight_number.clone(),
            origin: flight.origin.display(),
            destination: flight.destination.display(),
            date: self.clock.date_label(flight.departure),
            departure_time: Some(self.clock.time_label(flight.departure)),
            arrival_time: Some(self.clock.time_label(flight.arrival)),
        }];

        if let (TripKind::RoundTrip, Some(leg)) = (trip, details.return_leg.as_ref()) {
            itinerary.push(ItineraryLeg {
                direction: notices::return_label(),
                flight_number: leg.flight_number.clone(),
                origin: flight.destination.display(),
                destination: flight.origin.display(),
                date: leg
                    .departure_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "TBC".to_string()),
                departure_time: None,
                arrival_time: None,
            });
        }

        let passenger = &details.passenger;
        let roster = vec![RosterEntry {
            full_name: passenger.full_name(),
            nationality: passenger.nationality.clone(),
            phone: passenger.phone.as_ref().map(|p| p.expose().clone()),
        }];

        let settled = details.payment.is_settled();
        let payment = PaymentSummary {
            method: details.payment.label(),
            total: format_amount(details.total),
            currency: details.currency,
            settled,
            status: notices::payment_status(settled),
        };

        TicketDocument {
            booking_reference: booking.reference.to_string(),
            company_name: self.company.name.clone(),
            charter_kind: flight.charter_kind,
            trip,
            trip_label: notices::trip_label(trip),
            itinerary,
            passengers: roster,
            payment,
            notices: notices::legal_notices(flight.charter_kind),
            support: Localized::new(
                format!("Questions? Call {} or write to {}.", self.company.support_phone, self.company.support_email),
                format!(
                    "Des questions ? Appelez le {} ou écrivez à {}.",
                    self.company.support_phone, self.company.support_email
                ),
            ),
            issued_on: self.clock.date_label(booking.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use charter_core::booking::{BookingReference, NewBooking, ReturnLeg};
    use charter_core::payment::PaymentMethod;
    use charter_shared::{CharterKind, Currency, LegPrice, Masked, Passenger};
    use crate::test_support::flight;

    fn assembler() -> TicketAssembler {
        TicketAssembler::new(
            OperationalClock::default(),
            CompanyProfile {
                name: "Caribbean Charter Co.".to_string(),
                support_phone: "+509 2813 0000".to_string(),
                support_email: "ops@charter.example".to_string(),
            },
        )
    }

    fn booking(kind: CharterKind, payment: PaymentMethod, return_number: Option<&str>) -> Booking {
        let mut f = flight("HC204", kind);
        f.departure = Utc.with_ymd_and_hms(2026, 11, 2, 13, 30, 0).unwrap();
        f.arrival = f.departure + Duration::minutes(35);

        Booking {
            reference: BookingReference("CHR-7Q2K".to_string()),
            details: NewBooking {
                flight_id: f.id,
                passenger: Passenger {
                    first_name: "Jean".to_string(),
                    last_name: "Baptiste".to_string(),
                    email: Some(Masked("jean@example.com".to_string())),
                    phone: Some(Masked("+509 3700 0000".to_string())),
                    nationality: Some("HT".to_string()),
                    ..Default::default()
                },
                outbound: LegPrice::reference(189.0),
                return_leg: return_number.map(|n| ReturnLeg {
                    flight_number: n.to_string(),
                    departure_date: NaiveDate::from_ymd_opt(2026, 11, 9),
                    price: LegPrice::reference(150.0),
                }),
                payment,
                total: 339.0,
                currency: Currency::Usd,
            },
            flight: f,
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let b = booking(CharterKind::Helicopter, PaymentMethod::Card, Some("HC205"));
        let a = assembler();
        assert_eq!(a.assemble(&b), a.assemble(&b));
    }

    #[test]
    fn test_round_trip_itinerary() {
        let doc = assembler().assemble(&booking(CharterKind::Helicopter, PaymentMethod::Card, Some("HC205")));
        assert_eq!(doc.trip, TripKind::RoundTrip);
        assert_eq!(doc.trip_label.en, "Round trip");
        assert_eq!(doc.itinerary.len(), 2);

        let outbound = &doc.itinerary[0];
        assert_eq!(outbound.departure_time.as_deref(), Some("08:30"));
        assert_eq!(outbound.origin, "Port-au-Prince - Toussaint Louverture (PAP)");

        let ret = &doc.itinerary[1];
        assert_eq!(ret.flight_number, "HC205");
        assert_eq!(ret.origin, "Jacmel (JAK)");
        assert_eq!(ret.date, "2026-11-09");
        assert_eq!(doc.payment.total, "339.00");
    }

    #[test]
    fn test_blank_return_number_is_one_way() {
        let doc = assembler().assemble(&booking(CharterKind::Plane, PaymentMethod::Card, Some("  ")));
        assert_eq!(doc.trip, TripKind::OneWay);
        assert_eq!(doc.trip_label.fr, "Aller simple");
        assert_eq!(doc.itinerary.len(), 1);
        assert!(doc.notices[0].en.contains("20 kg"));
    }

    #[test]
    fn test_only_contract_is_unsettled() {
        let a = assembler();
        let contract = a.assemble(&booking(CharterKind::Plane, PaymentMethod::Contract, None));
        assert!(!contract.payment.settled);
        assert_eq!(contract.payment.status.fr, "Non payé, facturé sous contrat");

        for method in [PaymentMethod::Card, PaymentMethod::MobileMoney, PaymentMethod::BankTransfer, PaymentMethod::default()] {
            let doc = a.assemble(&booking(CharterKind::Plane, method, None));
            assert!(doc.payment.settled);
            assert_eq!(doc.payment.status.en, "Paid");
        }
    }

    #[test]
    fn test_roster_carries_contact_phone() {
        let doc = assembler().assemble(&booking(CharterKind::Helicopter, PaymentMethod::Card, None));
        assert_eq!(doc.passengers[0].full_name, "Jean Baptiste");
        assert_eq!(doc.passengers[0].phone.as_deref(), Some("+509 3700 0000"));
        assert_eq!(doc.issued_on, "2026-10-16");
        assert!(doc.notices[0].en.contains("15 kg"));
    }
}
