//! One booking modal, driven over a WebSocket.
//!
//! The session exclusively owns its draft, return-leg resolver and
//! suggestion cache. Commands come in as form events; every change goes back
//! out as a draft snapshot. Dropping the session cancels its timers.

use std::sync::Arc;
use axum::extract::ws::{Message, WebSocket};
use chrono::{NaiveDate, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use charter_catalog::pricing::format_amount;
use charter_catalog::FareQuote;
use charter_core::payment::PaymentMethodKind;
use charter_offer::{
    submission_blockers, BookingDraft, PassengerField, ResolverEvent, ResolverOutcome, ResolverState,
    ReturnLegResolver, SuggestionCache, SuggestionEvent, SuggestionOutcome,
};
use charter_order::Checkout;
use charter_shared::{Currency, Flight, LegPrice, PassengerSuggestion, TicketDocument};

use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    SetPassengerField { field: PassengerField, value: String },
    SelectSuggestion { id: String },
    NameBlur,
    OutsideClick,
    SetRoundTrip { enabled: bool },
    SetReturnFlightNumber { value: String },
    SetReturnDate { date: Option<NaiveDate> },
    SetPaymentMethod { method: PaymentMethodKind },
    SetCashCurrency { currency: Currency },
    SetExchangeRate { value: String },
    Submit,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DraftSnapshot {
    /// Absent while the legs' currencies cannot be reconciled; the reason is
    /// among the blockers
    pub quote: Option<FareQuote>,
    pub display_total: Option<String>,
    pub round_trip: bool,
    pub return_flight_number: String,
    pub return_price: Option<LegPrice>,
    pub resolver: ResolverState,
    pub blockers: Vec<String>,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Snapshot { draft: DraftSnapshot },
    Suggestions { entries: Vec<PassengerSuggestion> },
    Notice { level: NoticeLevel, message: String },
    Confirmed { reference: String, ticket: TicketDocument },
}

fn notice(level: NoticeLevel, message: impl Into<String>) -> SessionEvent {
    SessionEvent::Notice {
        level,
        message: message.into(),
    }
}

pub struct BookingSession {
    draft: BookingDraft,
    resolver: ReturnLegResolver,
    suggestions: SuggestionCache,
    checkout: Arc<Checkout>,
    finished: bool,
}

impl BookingSession {
    pub fn new(
        flight: Flight,
        state: &AppState,
        resolver_events: mpsc::UnboundedSender<ResolverEvent>,
        suggestion_events: mpsc::UnboundedSender<SuggestionEvent>,
    ) -> Self {
        Self {
            draft: BookingDraft::new(flight),
            resolver: ReturnLegResolver::new(state.backend.prices.clone(), state.resolver.clone(), resolver_events),
            suggestions: SuggestionCache::new(
                state.backend.passengers.clone(),
                state.suggestions.clone(),
                suggestion_events,
            ),
            checkout: state.checkout.clone(),
            finished: false,
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Set once a booking is confirmed; the modal closes
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn snapshot(&self) -> SessionEvent {
        let quote = self.draft.quote().ok();
        let blockers: Vec<String> = submission_blockers(&self.draft, Utc::now())
            .iter()
            .map(|b| b.to_string())
            .collect();
        SessionEvent::Snapshot {
            draft: DraftSnapshot {
                display_total: quote.as_ref().map(FareQuote::display),
                quote,
                round_trip: self.draft.is_round_trip(),
                return_flight_number: self.draft.return_flight_number().to_string(),
                return_price: self.draft.return_price(),
                resolver: self.resolver.state(),
                can_submit: blockers.is_empty(),
                blockers,
            },
        }
    }

    pub async fn handle(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        match command {
            SessionCommand::SetPassengerField { field, value } => {
                self.draft.set_passenger_field(field, &value);
                if matches!(field, PassengerField::FirstName | PassengerField::LastName) {
                    self.suggestions.on_name_input(&value);
                    if !self.suggestions.is_open() {
                        return vec![SessionEvent::Suggestions { entries: Vec::new() }, self.snapshot()];
                    }
                }
            }
            SessionCommand::SelectSuggestion { id } => {
                if let Some(picked) = self.suggestions.select(&id) {
                    self.draft.apply_suggestion(&picked);
                }
                return vec![SessionEvent::Suggestions { entries: Vec::new() }, self.snapshot()];
            }
            SessionCommand::NameBlur => {
                self.suggestions.on_blur();
                return Vec::new();
            }
            SessionCommand::OutsideClick => {
                self.suggestions.on_outside_click();
                return vec![SessionEvent::Suggestions { entries: Vec::new() }];
            }
            SessionCommand::SetRoundTrip { enabled } => {
                self.draft.set_round_trip(enabled);
                if !enabled {
                    self.resolver.reset();
                }
            }
            // The field is hidden on one-way trips
            SessionCommand::SetReturnFlightNumber { .. } if !self.draft.is_round_trip() => {}
            SessionCommand::SetReturnFlightNumber { value } => {
                self.draft.set_return_flight_number(&value);
                self.draft.set_return_price(None);
                self.resolver.on_input(&value);
            }
            SessionCommand::SetReturnDate { date } => self.draft.set_return_date(date),
            SessionCommand::SetPaymentMethod { method } => self.draft.set_payment_method(method),
            SessionCommand::SetCashCurrency { currency } => self.draft.set_cash_currency(currency),
            SessionCommand::SetExchangeRate { value } => self.draft.set_exchange_rate(&value),
            SessionCommand::Submit => return self.submit().await,
        }
        vec![self.snapshot()]
    }

    async fn submit(&mut self) -> Vec<SessionEvent> {
        match self.checkout.submit(&self.draft, Utc::now()).await {
            Ok(receipt) => {
                self.finished = true;
                vec![
                    notice(
                        NoticeLevel::Info,
                        format!("Booking {} confirmed. The e-ticket is on its way.", receipt.reference),
                    ),
                    SessionEvent::Confirmed {
                        reference: receipt.reference.to_string(),
                        ticket: receipt.ticket,
                    },
                ]
            }
            Err(e) => {
                warn!("Checkout failed: {}", e);
                vec![notice(NoticeLevel::Error, e.user_message()), self.snapshot()]
            }
        }
    }

    pub fn on_resolver_event(&mut self, event: ResolverEvent) -> Vec<SessionEvent> {
        let Some(outcome) = self.resolver.apply(event) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        match outcome {
            ResolverOutcome::Fetching | ResolverOutcome::Cleared => {}
            ResolverOutcome::Resolved(price) => {
                self.draft.set_return_price(Some(price));
                out.push(notice(
                    NoticeLevel::Info,
                    format!("Return flight found: {} {}", format_amount(price.amount), price.currency),
                ));
            }
            ResolverOutcome::NotFound { flight_number, notify } => {
                self.draft.set_return_price(None);
                if notify {
                    out.push(notice(NoticeLevel::Warning, format!("No flight found with number {}", flight_number)));
                }
            }
            ResolverOutcome::Failed { message } => {
                self.draft.set_return_price(None);
                out.push(notice(NoticeLevel::Error, message));
            }
        }
        out.push(self.snapshot());
        out
    }

    pub fn on_suggestion_event(&mut self, event: SuggestionEvent) -> Vec<SessionEvent> {
        match self.suggestions.apply(event) {
            None => Vec::new(),
            Some(SuggestionOutcome::Failed { message }) => vec![
                SessionEvent::Suggestions { entries: Vec::new() },
                notice(NoticeLevel::Warning, message),
            ],
            Some(_) => vec![SessionEvent::Suggestions {
                entries: self.suggestions.entries().to_vec(),
            }],
        }
    }
}

/// Socket pump: commands in, events out, background results folded in
pub async fn run(socket: WebSocket, state: AppState, flight: Flight) {
    let flight_id = flight.id;
    info!(%flight_id, "Booking session opened");

    let (mut sender, mut receiver) = socket.split();
    let (resolver_tx, mut resolver_rx) = mpsc::unbounded_channel();
    let (suggestion_tx, mut suggestion_rx) = mpsc::unbounded_channel();
    let mut session = BookingSession::new(flight, &state, resolver_tx, suggestion_tx);

    let mut outgoing = vec![session.snapshot()];
    loop {
        for event in outgoing.drain(..) {
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!(%flight_id, "Booking session client went away");
                return;
            }
        }
        if session.is_finished() {
            break;
        }

        tokio::select! {
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<SessionCommand>(text.as_str()) {
                    Ok(command) => outgoing = session.handle(command).await,
                    Err(e) => outgoing.push(notice(NoticeLevel::Error, format!("Unrecognized command: {}", e))),
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(%flight_id, "Booking session socket error: {}", e);
                    break;
                }
            },
            Some(event) = resolver_rx.recv() => outgoing = session.on_resolver_event(event),
            Some(event) = suggestion_rx.recv() => outgoing = session.on_suggestion_event(event),
        }
    }

    let _ = sender.close().await;
    info!(%flight_id, "Booking session closed");
}
