use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::pii::Masked;

/// Primary passenger identity as captured by the booking form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<Masked<String>>,
    pub phone: Option<Masked<String>>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub id_number: Option<Masked<String>>,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn email_address(&self) -> Option<&str> {
        self.email.as_ref().map(|e| e.0.as_str()).filter(|e| !e.trim().is_empty())
    }
}

/// One row returned by the passenger-search collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassengerSuggestion {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub id_number: Option<String>,
}

impl From<&PassengerSuggestion> for Passenger {
    fn from(s: &PassengerSuggestion) -> Self {
        Self {
            first_name: s.first_name.clone(),
            last_name: s.last_name.clone(),
            email: s.email.clone().map(Masked),
            phone: s.phone.clone().map(Masked),
            nationality: s.nationality.clone(),
            date_of_birth: s.date_of_birth,
            id_number: s.id_number.clone().map(Masked),
        }
    }
}
