use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement currencies accepted at the counter.
///
/// USD is the reference currency every base fare is quoted in; HTG is the
/// local currency cash payments may settle in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Htg,
}

impl Currency {
    pub const REFERENCE: Currency = Currency::Usd;
    pub const LOCAL: Currency = Currency::Htg;

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Htg => "HTG",
        }
    }

    pub fn is_local(&self) -> bool {
        *self == Currency::LOCAL
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "HTG" => Ok(Currency::Htg),
            other => Err(format!("unsupported currency: {}", other)),
        }
    }
}

/// Price of one leg. Superseded, never edited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LegPrice {
    pub amount: f64,
    pub currency: Currency,
}

impl LegPrice {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Outbound legs come straight from a flight's base fare
    pub fn reference(amount: f64) -> Self {
        Self::new(amount, Currency::REFERENCE)
    }
}
