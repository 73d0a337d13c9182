use serde::{Deserialize, Serialize};
use charter_core::payment::PaymentMethod;
use charter_shared::{Currency, LegPrice};

/// Parse a form amount; anything unparseable or non-finite is zero.
pub fn parse_amount(input: &str) -> f64 {
    input
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Coerce a collaborator payload value (number, numeric string, null) to an amount
pub fn coerce_amount(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        serde_json::Value::String(s) => parse_amount(s),
        _ => 0.0,
    }
}

/// A rate is an override only when strictly positive
pub fn usable_rate(exchange_rate: Option<f64>) -> Option<f64> {
    exchange_rate.filter(|r| r.is_finite() && *r > 0.0)
}

/// Reference-currency amount expressed in the settlement currency.
///
/// Multiplies only when settling in the local currency with a usable rate;
/// every other combination is the identity.
pub fn normalize(amount: f64, exchange_rate: Option<f64>, settlement: Currency) -> f64 {
    match usable_rate(exchange_rate) {
        Some(rate) if settlement.is_local() => amount * rate,
        _ => amount,
    }
}

/// One leg expressed in the settlement currency.
///
/// Reference-currency legs go through [`normalize`]. A leg already priced in
/// the local currency is never multiplied again; it is kept when settling
/// locally and divided by the rate when settling in the reference currency.
/// Without a usable rate a local leg cannot be put on the same footing as a
/// reference leg, so `None` is returned rather than a mixed-currency amount.
pub fn normalize_leg(leg: &LegPrice, exchange_rate: Option<f64>, settlement: Currency) -> Option<f64> {
    if !leg.currency.is_local() {
        return Some(normalize(leg.amount, exchange_rate, settlement));
    }
    match usable_rate(exchange_rate) {
        Some(_) if settlement.is_local() => Some(leg.amount),
        Some(rate) => Some(leg.amount / rate),
        None => None,
    }
}

pub fn combine(outbound: f64, return_leg: Option<f64>, round_trip: bool) -> f64 {
    match return_leg {
        Some(ret) if round_trip => outbound + ret,
        _ => outbound,
    }
}

pub fn display_currency(settlement: Currency) -> Currency {
    if settlement.is_local() {
        Currency::Htg
    } else {
        Currency::Usd
    }
}

/// Presentation only; arithmetic keeps full precision
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Normalized trip price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FareQuote {
    pub outbound: f64,
    pub return_leg: Option<f64>,
    pub total: f64,
    pub currency: Currency,
}

impl FareQuote {
    /// e.g. "25515.00 HTG"
    pub fn display(&self) -> String {
        format!("{} {}", format_amount(self.total), self.currency)
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("A fare priced in {currency} needs an exchange rate to be settled in {settlement}")]
    UnconvertibleLeg {
        currency: Currency,
        settlement: Currency,
    },
}

/// Composes independently priced legs under a booking's payment method
pub struct FareCalculator;

impl FareCalculator {
    pub fn quote(
        outbound: &LegPrice,
        return_leg: Option<&LegPrice>,
        round_trip: bool,
        payment: &PaymentMethod,
    ) -> Result<FareQuote, PricingError> {
        let settlement = payment.settlement_currency();
        let rate = payment.exchange_rate();
        let leg_amount = |leg: &LegPrice| {
            normalize_leg(leg, rate, settlement).ok_or(PricingError::UnconvertibleLeg {
                currency: leg.currency,
                settlement,
            })
        };

        let outbound_amount = leg_amount(outbound)?;
        let return_amount = match return_leg.filter(|_| round_trip) {
            Some(leg) => Some(leg_amount(leg)?),
            None => None,
        };

        Ok(FareQuote {
            outbound: outbound_amount,
            return_leg: return_amount,
            total: combine(outbound_amount, return_amount, round_trip),
            currency: display_currency(settlement),
        })
    }
}
