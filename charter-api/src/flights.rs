use std::convert::Infallible;
use std::time::Duration;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;
use uuid::Uuid;
use charter_core::identity::Actor;
use charter_core::requests::FlightDraft;
use charter_shared::Flight;

use crate::error::AppError;
use crate::middleware::staff_auth_middleware;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CancelBody {
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleBody {
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/v1/admin/flights", get(list_flights).post(create_flight))
        .route("/v1/admin/flights/stream", get(flight_events))
        .route("/v1/admin/flights/{id}", put(edit_flight).delete(delete_flight))
        .route("/v1/admin/flights/{id}/cancel", post(cancel_flight))
        .route("/v1/admin/flights/{id}/reschedule", post(reschedule_flight))
        .route_layer(middleware::from_fn_with_state(state, staff_auth_middleware));

    Router::new()
        .route("/v1/flights", get(bookable_flights))
        .merge(admin)
}

/// Public schedule: active flights that have not left yet
async fn bookable_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, AppError> {
    let now = Utc::now();
    let flights = state.backend.flights.list_flights().await?;
    Ok(Json(
        flights
            .into_iter()
            .filter(|f| f.status.is_active() && f.departure > now)
            .collect(),
    ))
}

async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, AppError> {
    let mut lifecycle = state.lifecycle.lock().await;
    let flights = lifecycle.refresh().await?.to_vec();
    Ok(Json(flights))
}

async fn create_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(draft): Json<FlightDraft>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    let flight = state.lifecycle.lock().await.create(Some(&actor), &draft).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

async fn edit_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(draft): Json<FlightDraft>,
) -> Result<Json<Flight>, AppError> {
    let flight = state.lifecycle.lock().await.edit(Some(&actor), id, &draft).await?;
    Ok(Json(flight))
}

async fn cancel_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(body): Json<CancelBody>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let mut lifecycle = state.lifecycle.lock().await;
    lifecycle.cancel(Some(&actor), id, &body.note).await?;
    Ok(Json(lifecycle.flights().to_vec()))
}

async fn reschedule_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(body): Json<RescheduleBody>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let mut lifecycle = state.lifecycle.lock().await;
    lifecycle
        .reschedule(Some(&actor), id, body.departure, body.arrival)
        .await?;
    Ok(Json(lifecycle.flights().to_vec()))
}

async fn delete_flight(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.lifecycle.lock().await.delete(Some(&actor), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change notifications for the operations dashboard.
/// Informational only; clients reload the list for authoritative data.
async fn flight_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default().event(event.name()).json_data(&event).ok().map(Ok),
            Err(lagged) => {
                debug!("Dashboard stream lagged: {}", lagged);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
