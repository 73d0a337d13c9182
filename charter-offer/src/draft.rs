use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use charter_catalog::pricing::parse_amount;
use charter_catalog::{FareCalculator, FareQuote, PricingError};
use charter_core::payment::{CashSettlement, PaymentMethod, PaymentMethodKind};
use charter_shared::{Currency, Flight, LegPrice, Masked, Passenger, PassengerSuggestion};

/// Passenger form inputs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PassengerField {
    FirstName,
    LastName,
    Email,
    Phone,
    Nationality,
    DateOfBirth,
    IdNumber,
}

/// Transient booking aggregate owned by one open booking modal.
///
/// Fields are private: every change goes through a setter so the fare
/// invariants hold after each form event.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    flight: Flight,
    passenger: Passenger,
    round_trip: bool,
    return_flight_number: String,
    return_date: Option<NaiveDate>,
    return_price: Option<LegPrice>,
    payment: PaymentMethod,
}

impl BookingDraft {
    pub fn new(flight: Flight) -> Self {
        Self {
            flight,
            passenger: Passenger::default(),
            round_trip: false,
            return_flight_number: String::new(),
            return_date: None,
            return_price: None,
            payment: PaymentMethod::default(),
        }
    }

    pub fn flight(&self) -> &Flight {
        &self.flight
    }

    pub fn passenger(&self) -> &Passenger {
        &self.passenger
    }

    pub fn is_round_trip(&self) -> bool {
        self.round_trip
    }

    pub fn return_flight_number(&self) -> &str {
        &self.return_flight_number
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn return_price(&self) -> Option<LegPrice> {
        self.return_price
    }

    pub fn payment(&self) -> &PaymentMethod {
        &self.payment
    }

    /// Outbound leg, always in the reference currency
    pub fn outbound_price(&self) -> LegPrice {
        LegPrice::reference(self.flight.base_price)
    }

    pub fn set_passenger_field(&mut self, field: PassengerField, value: &str) {
        let text = value.to_string();
        let optional = || Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match field {
            PassengerField::FirstName => self.passenger.first_name = text,
            PassengerField::LastName => self.passenger.last_name = text,
            PassengerField::Email => self.passenger.email = optional().map(Masked),
            PassengerField::Phone => self.passenger.phone = optional().map(Masked),
            PassengerField::Nationality => self.passenger.nationality = optional(),
            PassengerField::DateOfBirth => {
                self.passenger.date_of_birth = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
            }
            PassengerField::IdNumber => self.passenger.id_number = optional().map(Masked),
        }
    }

    /// Replaces every identity field at once from an autocomplete pick
    pub fn apply_suggestion(&mut self, suggestion: &PassengerSuggestion) {
        self.passenger = Passenger::from(suggestion);
    }

    /// Turning the return leg off forgets its flight number and price
    pub fn set_round_trip(&mut self, enabled: bool) {
        self.round_trip = enabled;
        if !enabled {
            self.return_flight_number.clear();
            self.return_date = None;
            self.return_price = None;
        }
    }

    /// A new flight number supersedes whatever price the old one resolved to
    pub fn set_return_flight_number(&mut self, input: &str) {
        if self.return_flight_number != input {
            self.return_price = None;
        }
        self.return_flight_number = input.to_string();
    }

    pub fn set_return_date(&mut self, date: Option<NaiveDate>) {
        self.return_date = date;
    }

    /// Written by the return-leg resolver only
    pub fn set_return_price(&mut self, price: Option<LegPrice>) {
        self.return_price = price;
    }

    pub fn set_payment_method(&mut self, kind: PaymentMethodKind) {
        if self.payment.kind() != kind {
            self.payment = PaymentMethod::from_kind(kind);
        }
    }

    /// Only cash has a settlement choice; other methods settle in USD
    pub fn set_cash_currency(&mut self, currency: Currency) {
        if let PaymentMethod::Cash { settlement } = &mut self.payment {
            *settlement = match (currency, *settlement) {
                (Currency::Htg, CashSettlement::Htg { exchange_rate }) => CashSettlement::Htg { exchange_rate },
                (Currency::Htg, CashSettlement::Usd) => CashSettlement::Htg { exchange_rate: None },
                (Currency::Usd, _) => CashSettlement::Usd,
            };
        }
    }

    /// Ignored unless paying cash in the local currency; a non-positive or
    /// unparseable rate means "no override".
    pub fn set_exchange_rate(&mut self, input: &str) {
        if let PaymentMethod::Cash {
            settlement: CashSettlement::Htg { exchange_rate },
        } = &mut self.payment
        {
            let rate = parse_amount(input);
            *exchange_rate = if rate > 0.0 { Some(rate) } else { None };
        }
    }

    /// Fails only when a leg's currency cannot be reconciled with the payment
    pub fn quote(&self) -> Result<FareQuote, PricingError> {
        FareCalculator::quote(
            &self.outbound_price(),
            self.return_price.as_ref(),
            self.round_trip,
            &self.payment,
        )
    }
}
