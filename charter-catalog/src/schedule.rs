use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use charter_core::requests::FlightDraft;

pub const DEFAULT_TIME_ZONE: &str = "America/Port-au-Prince";

/// Departure and arrival instants are stored in UTC and shown in a single
/// operational time zone, whatever the viewer's locale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationalClock {
    tz: Tz,
}

impl Default for OperationalClock {
    fn default() -> Self {
        Self {
            tz: chrono_tz::America::PortauPrince,
        }
    }
}

impl OperationalClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self, ScheduleError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ScheduleError::UnknownTimeZone(name.to_string()))
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    pub fn date_label(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%Y-%m-%d").to_string()
    }

    pub fn time_label(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%H:%M").to_string()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScheduleError {
    #[error("Arrival must be after departure")]
    ArrivalNotAfterDeparture,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Origin and destination must differ")]
    SameOriginDestination,

    #[error("Invalid capacity: {available} available of {total} seats")]
    InvalidCapacity {
        total: u32,
        available: u32,
    },

    #[error("Base price must be a non-negative amount")]
    InvalidPrice,

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

pub fn validate_window(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> Result<(), ScheduleError> {
    if arrival <= departure {
        return Err(ScheduleError::ArrivalNotAfterDeparture);
    }
    Ok(())
}

/// Field checks shared by create and edit
pub fn validate_flight_draft(draft: &FlightDraft) -> Result<(), ScheduleError> {
    if draft.flight_number.trim().is_empty() {
        return Err(ScheduleError::MissingField("flight_number"));
    }
    if draft.tail_number.trim().is_empty() {
        return Err(ScheduleError::MissingField("tail_number"));
    }
    if draft.origin.code.trim().is_empty() {
        return Err(ScheduleError::MissingField("origin"));
    }
    if draft.destination.code.trim().is_empty() {
        return Err(ScheduleError::MissingField("destination"));
    }
    if draft.origin.code.eq_ignore_ascii_case(&draft.destination.code) {
        return Err(ScheduleError::SameOriginDestination);
    }
    validate_window(draft.departure, draft.arrival)?;
    if draft.total_seats == 0 || draft.available_seats > draft.total_seats {
        return Err(ScheduleError::InvalidCapacity {
            total: draft.total_seats,
            available: draft.available_seats,
        });
    }
    if !draft.base_price.is_finite() || draft.base_price < 0.0 {
        return Err(ScheduleError::InvalidPrice);
    }
    Ok(())
}
