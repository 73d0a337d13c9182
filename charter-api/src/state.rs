use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use charter_catalog::{OperationalClock, ScheduleError};
use charter_core::delivery::TicketDelivery;
use charter_core::identity::{PrivilegeCheck, RoleClaimCheck};
use charter_core::repository::{BookingRepository, FlightRepository, PassengerDirectory, PriceLookup};
use charter_offer::{ResolverConfig, SuggestionConfig};
use charter_order::{Checkout, CompanyProfile, FlightLifecycle, LifecycleConfig, TicketAssembler};
use charter_shared::FlightEvent;
use charter_store::Config;

/// Dashboard subscribers that fall further behind than this lose events
const EVENT_BUFFER_SIZE: usize = 100;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

/// Collaborators behind the console
#[derive(Clone)]
pub struct Backend {
    pub flights: Arc<dyn FlightRepository>,
    pub prices: Arc<dyn PriceLookup>,
    pub passengers: Arc<dyn PassengerDirectory>,
    pub bookings: Arc<dyn BookingRepository>,
    pub delivery: Arc<dyn TicketDelivery>,
    pub privileges: Arc<dyn PrivilegeCheck>,
}

impl Backend {
    /// One service answering every collaborator role
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: FlightRepository + PriceLookup + PassengerDirectory + BookingRepository + TicketDelivery + 'static,
    {
        Self {
            flights: backend.clone(),
            prices: backend.clone(),
            passengers: backend.clone(),
            bookings: backend.clone(),
            delivery: backend,
            privileges: Arc::new(RoleClaimCheck),
        }
    }
}

#[derive(Clone)]
pub struct Settings {
    pub auth: AuthConfig,
    pub lifecycle: LifecycleConfig,
    pub resolver: ResolverConfig,
    pub suggestions: SuggestionConfig,
    pub clock: OperationalClock,
    pub company: CompanyProfile,
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Self, ScheduleError> {
        let booking = &config.booking;
        Ok(Self {
            auth: AuthConfig {
                secret: config.auth.jwt_secret.clone(),
            },
            lifecycle: LifecycleConfig {
                cancellation_note_max_len: config.operations.cancellation_note_max_len,
            },
            resolver: ResolverConfig {
                debounce: Duration::from_millis(booking.debounce_ms),
                min_debounce_len: booking.min_debounce_len,
                min_lookup_len: booking.min_lookup_len,
                notify_not_found_len: booking.notify_not_found_len,
            },
            suggestions: SuggestionConfig {
                min_query_len: booking.min_suggestion_len,
                blur_grace: Duration::from_millis(booking.blur_grace_ms),
            },
            clock: OperationalClock::from_name(&config.operations.time_zone)?,
            company: CompanyProfile {
                name: config.ticket.company_name.clone(),
                support_phone: config.ticket.support_phone.clone(),
                support_email: config.ticket.support_email.clone(),
            },
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    /// The dashboard's flight list has exactly one owner
    pub lifecycle: Arc<Mutex<FlightLifecycle>>,
    pub checkout: Arc<Checkout>,
    pub events: broadcast::Sender<FlightEvent>,
    pub auth: AuthConfig,
    pub resolver: ResolverConfig,
    pub suggestions: SuggestionConfig,
}

impl AppState {
    pub fn new(backend: Backend, settings: Settings) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);

        let lifecycle = FlightLifecycle::new(
            backend.flights.clone(),
            backend.privileges.clone(),
            settings.lifecycle,
            events.clone(),
        );
        let checkout = Checkout::new(
            backend.bookings.clone(),
            backend.delivery.clone(),
            TicketAssembler::new(settings.clock, settings.company),
            events.clone(),
        );

        Self {
            backend,
            lifecycle: Arc::new(Mutex::new(lifecycle)),
            checkout: Arc::new(checkout),
            events,
            auth: settings.auth,
            resolver: settings.resolver,
            suggestions: settings.suggestions,
        }
    }
}
