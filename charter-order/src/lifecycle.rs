use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;
use charter_catalog::schedule::{validate_flight_draft, validate_window, ScheduleError};
use charter_core::identity::{require_admin, Actor, PrivilegeCheck};
use charter_core::repository::FlightRepository;
use charter_core::requests::{CancelFlightRequest, FlightDraft, RescheduleFlightRequest};
use charter_core::{CoreError, RemoteError, GENERIC_FAILURE};
use charter_shared::{Flight, FlightEvent};

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub cancellation_note_max_len: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            cancellation_note_max_len: 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("{0}")]
    Validation(String),

    #[error("Flight not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: String,
        to: String,
    },

    #[error("Failed to {action} flight: {source}")]
    Remote {
        action: &'static str,
        #[source]
        source: RemoteError,
    },
}

impl From<CoreError> for LifecycleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized(msg) => LifecycleError::Unauthorized(msg),
            CoreError::ValidationError(msg) => LifecycleError::Validation(msg),
            CoreError::NotFound(msg) => LifecycleError::NotFound(msg),
            CoreError::Remote(source) => LifecycleError::Remote {
                action: "update",
                source,
            },
        }
    }
}

impl LifecycleError {
    /// Text for the admin's notification. Collaborator failures show the
    /// service's own `error` text when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            LifecycleError::Remote { source, .. } => source.user_message(GENERIC_FAILURE),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LifecycleError::Unauthorized(_))
    }
}

/// Operations-dashboard owner of the flight list.
///
/// Every transition is admin-gated and fails closed. The local list is only
/// a view: after any successful mutation it is reloaded from the backing
/// service, which also settles conflicting transitions.
pub struct FlightLifecycle {
    repo: Arc<dyn FlightRepository>,
    privileges: Arc<dyn PrivilegeCheck>,
    config: LifecycleConfig,
    flights: Vec<Flight>,
    events: broadcast::Sender<FlightEvent>,
}

impl FlightLifecycle {
    pub fn new(
        repo: Arc<dyn FlightRepository>,
        privileges: Arc<dyn PrivilegeCheck>,
        config: LifecycleConfig,
        events: broadcast::Sender<FlightEvent>,
    ) -> Self {
        Self {
            repo,
            privileges,
            config,
            flights: Vec::new(),
            events,
        }
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn flight(&self, id: Uuid) -> Option<&Flight> {
        self.flights.iter().find(|f| f.id == id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlightEvent> {
        self.events.subscribe()
    }

    /// Replace the local list with the service's
    pub async fn refresh(&mut self) -> Result<&[Flight], LifecycleError> {
        let flights = self.repo.list_flights().await.map_err(|source| LifecycleError::Remote {
            action: "load",
            source,
        })?;
        self.flights = flights;
        Ok(&self.flights)
    }

    pub async fn create(&mut self, actor: Option<&Actor>, draft: &FlightDraft) -> Result<Flight, LifecycleError> {
        let actor = require_admin(self.privileges.as_ref(), actor, "create flights").await?;
        validate_flight_draft(draft)?;

        let flight = self.repo.create_flight(draft).await.map_err(|source| LifecycleError::Remote {
            action: "create",
            source,
        })?;

        info!(actor = %actor.id, flight_id = %flight.id, flight_number = %flight.flight_number, "Flight created");
        self.reconcile().await;
        self.publish(FlightEvent::FlightCreated {
            flight_id: flight.id,
            flight_number: flight.flight_number.clone(),
        });
        Ok(flight)
    }

    /// Field-level update. Cancelled flights are frozen.
    pub async fn edit(&mut self, actor: Option<&Actor>, id: Uuid, draft: &FlightDraft) -> Result<Flight, LifecycleError> {
        let actor = require_admin(self.privileges.as_ref(), actor, "edit flights").await?;
        validate_flight_draft(draft)?;

        let current = self.current(id).await?;
        if current.is_cancelled() {
            return Err(LifecycleError::InvalidTransition {
                from: "CANCELLED".to_string(),
                to: "EDITED".to_string(),
            });
        }

        let updated = self.repo.update_flight(id, draft).await.map_err(|source| LifecycleError::Remote {
            action: "update",
            source,
        })?;

        info!(actor = %actor.id, flight_id = %id, "Flight edited");
        self.reconcile().await;
        self.publish(FlightEvent::FlightUpdated { flight_id: id });
        Ok(updated)
    }

    pub async fn cancel(&mut self, actor: Option<&Actor>, id: Uuid, note: &str) -> Result<(), LifecycleError> {
        let actor = require_admin(self.privileges.as_ref(), actor, "cancel flights").await?;

        let note = note.trim();
        if note.is_empty() {
            return Err(LifecycleError::Validation("A cancellation note is required".to_string()));
        }
        if note.chars().count() > self.config.cancellation_note_max_len {
            return Err(LifecycleError::Validation(format!(
                "Cancellation note must be at most {} characters",
                self.config.cancellation_note_max_len
            )));
        }

        let current = self.current(id).await?;
        if current.is_cancelled() {
            return Err(LifecycleError::InvalidTransition {
                from: "CANCELLED".to_string(),
                to: "CANCELLED".to_string(),
            });
        }

        let request = CancelFlightRequest {
            flight_id: id,
            note: note.to_string(),
            flight_number: current.flight_number.clone(),
        };
        self.repo.cancel_flight(&request).await.map_err(|source| LifecycleError::Remote {
            action: "cancel",
            source,
        })?;

        info!(actor = %actor.id, flight_id = %id, flight_number = %current.flight_number, "Flight cancelled");
        if let Some(local) = self.flights.iter_mut().find(|f| f.id == id) {
            local.cancel(request.note.clone());
        }
        // Cancellation can cascade to bookings, so patching is not enough
        self.reconcile().await;
        self.publish(FlightEvent::FlightCancelled {
            flight_id: id,
            flight_number: request.flight_number,
        });
        Ok(())
    }

    pub async fn reschedule(
        &mut self,
        actor: Option<&Actor>,
        id: Uuid,
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        let actor = require_admin(self.privileges.as_ref(), actor, "reschedule flights").await?;
        validate_window(departure, arrival)?;

        let current = self.current(id).await?;
        if current.is_cancelled() {
            return Err(LifecycleError::InvalidTransition {
                from: "CANCELLED".to_string(),
                to: "RESCHEDULED".to_string(),
            });
        }

        let request = RescheduleFlightRequest {
            flight_id: id,
            departure,
            arrival,
        };
        self.repo.reschedule_flight(&request).await.map_err(|source| LifecycleError::Remote {
            action: "reschedule",
            source,
        })?;

        info!(actor = %actor.id, flight_id = %id, %departure, %arrival, "Flight rescheduled");
        self.reconcile().await;
        self.publish(FlightEvent::FlightRescheduled {
            flight_id: id,
            departure: departure.timestamp(),
            arrival: arrival.timestamp(),
        });
        Ok(())
    }

    /// Irreversible. The row leaves the local list before the service
    /// confirms, and the list is reloaded whatever the outcome, so a
    /// rejected delete brings the row back.
    pub async fn delete(&mut self, actor: Option<&Actor>, id: Uuid) -> Result<(), LifecycleError> {
        let actor = require_admin(self.privileges.as_ref(), actor, "delete flights").await?;

        self.flights.retain(|f| f.id != id);
        let outcome = self.repo.delete_flight(id).await;
        self.reconcile().await;

        match outcome {
            Ok(()) => {
                info!(actor = %actor.id, flight_id = %id, "Flight deleted");
                self.publish(FlightEvent::FlightDeleted { flight_id: id });
                Ok(())
            }
            Err(source) => {
                warn!(actor = %actor.id, flight_id = %id, "Flight delete rejected: {}", source);
                Err(LifecycleError::Remote {
                    action: "delete",
                    source,
                })
            }
        }
    }

    /// Local copy if loaded, otherwise ask the service
    async fn current(&self, id: Uuid) -> Result<Flight, LifecycleError> {
        if let Some(flight) = self.flight(id) {
            return Ok(flight.clone());
        }
        self.repo.get_flight(id).await.map_err(|source| match source {
            RemoteError::NotFound => LifecycleError::NotFound(id.to_string()),
            source => LifecycleError::Remote { action: "load", source },
        })
    }

    /// The mutation already landed; a failed reload only leaves the view stale
    async fn reconcile(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("Flight list refresh failed after mutation: {}", e);
        }
    }

    fn publish(&self, event: FlightEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
