use chrono::{DateTime, Utc};
use charter_catalog::{ensure_bookable, InventoryError, PricingError};
use charter_core::booking::{NewBooking, ReturnLeg};
use crate::draft::BookingDraft;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DraftError {
    #[error("Missing required passenger field: {0}")]
    MissingField(&'static str),

    #[error("Passenger e-mail address is not valid")]
    InvalidEmail,

    #[error("Round trip requires a return flight number")]
    MissingReturnFlightNumber,

    #[error("Return flight price has not been resolved")]
    ReturnPriceUnresolved,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Unavailable(#[from] InventoryError),
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Everything currently preventing submission, in form order.
/// An empty list means the submit control is enabled.
pub fn submission_blockers(draft: &BookingDraft, now: DateTime<Utc>) -> Vec<DraftError> {
    let mut blockers = Vec::new();
    let passenger = draft.passenger();

    if blank(&passenger.first_name) {
        blockers.push(DraftError::MissingField("first_name"));
    }
    if blank(&passenger.last_name) {
        blockers.push(DraftError::MissingField("last_name"));
    }
    match passenger.email_address() {
        None => blockers.push(DraftError::MissingField("email")),
        Some(email) if !plausible_email(email) => blockers.push(DraftError::InvalidEmail),
        Some(_) => {}
    }
    if passenger.phone.as_ref().map(|p| blank(p.expose())).unwrap_or(true) {
        blockers.push(DraftError::MissingField("phone"));
    }

    if draft.is_round_trip() {
        if blank(draft.return_flight_number()) {
            blockers.push(DraftError::MissingReturnFlightNumber);
        } else if draft.return_price().is_none() {
            blockers.push(DraftError::ReturnPriceUnresolved);
        }
    }
    if let Err(e) = draft.quote() {
        blockers.push(DraftError::Pricing(e));
    }

    if let Err(e) = ensure_bookable(draft.flight(), 1, now) {
        blockers.push(DraftError::Unavailable(e));
    }
    blockers
}

/// Turns a complete draft into the fields the booking collaborator accepts
pub fn finalize(draft: &BookingDraft, now: DateTime<Utc>) -> Result<NewBooking, DraftError> {
    if let Some(first) = submission_blockers(draft, now).into_iter().next() {
        return Err(first);
    }

    let quote = draft.quote()?;
    let return_leg = match (draft.is_round_trip(), draft.return_price()) {
        (true, Some(price)) => Some(ReturnLeg {
            flight_number: draft.return_flight_number().trim().to_uppercase(),
            departure_date: draft.return_date(),
            price,
        }),
        _ => None,
    };

    Ok(NewBooking {
        flight_id: draft.flight().id,
        passenger: draft.passenger().clone(),
        outbound: draft.outbound_price(),
        return_leg,
        payment: *draft.payment(),
        total: quote.total,
        currency: quote.currency,
    })
}
