use serde::{Deserialize, Serialize};
use crate::models::flight::CharterKind;
use crate::models::money::Currency;

/// English/French pair. Every printed string on the e-ticket carries both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Localized {
    pub en: String,
    pub fr: String,
}

impl Localized {
    pub fn new(en: impl Into<String>, fr: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            fr: fr.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripKind {
    OneWay,
    RoundTrip,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItineraryLeg {
    pub direction: Localized,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    /// Operational-time-zone date, e.g. "2026-11-02"
    pub date: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub full_name: String,
    pub nationality: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSummary {
    pub method: Localized,
    /// Fixed two-decimal presentation of the total
    pub total: String,
    pub currency: Currency,
    pub settled: bool,
    pub status: Localized,
}

/// Write-once e-ticket content handed to the delivery collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketDocument {
    pub booking_reference: String,
    pub company_name: String,
    pub charter_kind: CharterKind,
    pub trip: TripKind,
    pub trip_label: Localized,
    pub itinerary: Vec<ItineraryLeg>,
    pub passengers: Vec<RosterEntry>,
    pub payment: PaymentSummary,
    pub notices: Vec<Localized>,
    pub support: Localized,
    pub issued_on: String,
}
