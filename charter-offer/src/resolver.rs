//! Return-leg price resolution.
//!
//! Each keystroke on the return flight number supersedes the previous one:
//! its debounce timer is cancelled and its generation retired. A lookup that
//! was already dispatched is not aborted, but its answer carries a retired
//! generation and is dropped by [`ReturnLegResolver::apply`].

use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use charter_catalog::pricing::coerce_amount;
use charter_core::repository::PriceLookup;
use charter_core::search::{flight_number_key, PriceLookupResponse};
use charter_core::RemoteError;
use charter_shared::{Currency, LegPrice};
use crate::Generation;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub debounce: Duration,
    /// Shorter inputs go straight back to idle
    pub min_debounce_len: usize,
    /// Shorter inputs never reach the lookup
    pub min_lookup_len: usize,
    /// Not-found is only reported from this length on
    pub notify_not_found_len: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_debounce_len: 2,
            min_lookup_len: 3,
            notify_not_found_len: 5,
        }
    }
}

/// A not-found lookup is reported through [`ResolverOutcome::NotFound`] and
/// leaves the field back in `Idle` with no price.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolverState {
    Idle,
    Debouncing,
    Fetching,
    Resolved,
    Errored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolverOutcome {
    Fetching,
    /// Debounce expired below the lookup length
    Cleared,
    Resolved(LegPrice),
    NotFound { flight_number: String, notify: bool },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverEvent {
    pub generation: Generation,
    pub outcome: ResolverOutcome,
}

/// Pending debounce timer plus the generation it belongs to
#[derive(Debug, Default)]
struct DebounceSlot {
    generation: Generation,
    cancel: Option<oneshot::Sender<()>>,
}

impl DebounceSlot {
    /// Cancel the pending timer (if any) and open a new generation
    fn supersede(&mut self) -> Generation {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.generation += 1;
        self.generation
    }

    fn arm(&mut self, cancel: oneshot::Sender<()>) {
        self.cancel = Some(cancel);
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }
}

pub struct ReturnLegResolver {
    lookup: Arc<dyn PriceLookup>,
    config: ResolverConfig,
    slot: DebounceSlot,
    state: ResolverState,
    events: mpsc::UnboundedSender<ResolverEvent>,
}

impl ReturnLegResolver {
    pub fn new(
        lookup: Arc<dyn PriceLookup>,
        config: ResolverConfig,
        events: mpsc::UnboundedSender<ResolverEvent>,
    ) -> Self {
        Self {
            lookup,
            config,
            slot: DebounceSlot::default(),
            state: ResolverState::Idle,
            events,
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn generation(&self) -> Generation {
        self.slot.generation
    }

    /// Keystroke on the return flight number field.
    ///
    /// The caller clears the draft's resolved price before calling this; the
    /// resolver never keeps a price across inputs.
    pub fn on_input(&mut self, input: &str) -> Generation {
        let generation = self.slot.supersede();
        let key = flight_number_key(input);

        if key.chars().count() < self.config.min_debounce_len {
            self.state = ResolverState::Idle;
            return generation;
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.slot.arm(cancel_tx);
        self.state = ResolverState::Debouncing;

        tokio::spawn(debounced_lookup(
            self.lookup.clone(),
            self.config.clone(),
            generation,
            key,
            cancel_rx,
            self.events.clone(),
        ));
        generation
    }

    /// Round trip switched off or modal closing
    pub fn reset(&mut self) {
        self.slot.supersede();
        self.state = ResolverState::Idle;
    }

    /// Fold a background event into the state machine.
    /// Returns `None` when the event belongs to a superseded keystroke.
    pub fn apply(&mut self, event: ResolverEvent) -> Option<ResolverOutcome> {
        if !self.slot.is_current(event.generation) {
            debug!(
                stale = event.generation,
                current = self.slot.generation,
                "Dropping superseded return-leg lookup result"
            );
            return None;
        }

        self.state = match &event.outcome {
            ResolverOutcome::Fetching => ResolverState::Fetching,
            ResolverOutcome::Cleared => ResolverState::Idle,
            ResolverOutcome::Resolved(_) => ResolverState::Resolved,
            ResolverOutcome::NotFound { .. } => ResolverState::Idle,
            ResolverOutcome::Failed { .. } => ResolverState::Errored,
        };
        Some(event.outcome)
    }
}

impl Drop for ReturnLegResolver {
    fn drop(&mut self) {
        self.slot.supersede();
    }
}

async fn debounced_lookup(
    lookup: Arc<dyn PriceLookup>,
    config: ResolverConfig,
    generation: Generation,
    key: String,
    mut cancel: oneshot::Receiver<()>,
    events: mpsc::UnboundedSender<ResolverEvent>,
) {
    tokio::select! {
        _ = tokio::time::sleep(config.debounce) => {}
        _ = &mut cancel => {
            debug!(generation, "Return-leg debounce superseded");
            return;
        }
    }

    let send = |outcome: ResolverOutcome| {
        let _ = events.send(ResolverEvent { generation, outcome });
    };

    let len = key.chars().count();
    if len < config.min_lookup_len {
        send(ResolverOutcome::Cleared);
        return;
    }

    send(ResolverOutcome::Fetching);
    let notify = len >= config.notify_not_found_len;

    let outcome = match lookup.lookup_price(&key).await {
        Ok(response) => interpret(response, &key, notify),
        Err(RemoteError::NotFound) => {
            debug!(flight_number = %key, "Return flight not found");
            ResolverOutcome::NotFound { flight_number: key.clone(), notify }
        }
        Err(e) => {
            warn!(flight_number = %key, "Return-leg price lookup failed: {}", e);
            ResolverOutcome::Failed {
                message: e.user_message("Could not look up the return flight price."),
            }
        }
    };
    send(outcome);
}

/// Unsuccessful answers and non-positive prices count as not found
fn interpret(response: PriceLookupResponse, key: &str, notify: bool) -> ResolverOutcome {
    let amount = response.price.as_ref().map(coerce_amount).unwrap_or(0.0);
    if !response.success || amount <= 0.0 {
        return ResolverOutcome::NotFound {
            flight_number: key.to_string(),
            notify,
        };
    }

    let currency = response
        .currency
        .as_deref()
        .and_then(|c| c.parse::<Currency>().ok())
        .unwrap_or(Currency::REFERENCE);

    ResolverOutcome::Resolved(LegPrice::new(amount, currency))
}
