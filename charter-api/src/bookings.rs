use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use charter_catalog::{ensure_bookable, FareCalculator, FareQuote};
use charter_core::payment::PaymentMethod;
use charter_shared::LegPrice;

use crate::error::AppError;
use crate::session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Outbound base fare, reference currency
    pub outbound_fare: f64,
    #[serde(default)]
    pub return_leg: Option<LegPrice>,
    #[serde(default)]
    pub round_trip: bool,
    #[serde(default)]
    pub payment: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: FareQuote,
    pub display: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/quotes", post(quote))
        .route("/v1/flights/{id}/booking", get(open_booking))
}

fn valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

async fn quote(Json(req): Json<QuoteRequest>) -> Result<Json<QuoteResponse>, AppError> {
    if !valid_amount(req.outbound_fare) {
        return Err(AppError::ValidationError("Outbound fare must be a non-negative amount".to_string()));
    }
    if req.return_leg.is_some_and(|leg| !valid_amount(leg.amount)) {
        return Err(AppError::ValidationError("Return fare must be a non-negative amount".to_string()));
    }

    let quote = FareCalculator::quote(
        &LegPrice::reference(req.outbound_fare),
        req.return_leg.as_ref(),
        req.round_trip,
        &req.payment,
    )
    .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(Json(QuoteResponse {
        display: quote.display(),
        quote,
    }))
}

/// Opens a booking modal for one flight. Cancelled, departed and full
/// flights are refused before the upgrade.
async fn open_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let flight = state.backend.flights.get_flight(id).await?;
    ensure_bookable(&flight, 1, Utc::now()).map_err(|e| AppError::ConflictError(e.to_string()))?;

    Ok(ws.on_upgrade(move |socket| session::run(socket, state, flight)))
}
