use serde::{Deserialize, Serialize};

/// Body of the flight price lookup.
///
/// `price` is left untyped: the service has been seen returning numbers,
/// numeric strings and nulls, and the fare calculator coerces all of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceLookupResponse {
    pub success: bool,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Normalized lookup key for a free-text flight number
pub fn flight_number_key(input: &str) -> String {
    input.trim().to_uppercase()
}
