//! HTTP client for the backing flight/booking service.
//!
//! Status mapping at this boundary: 404 is `RemoteError::NotFound`, any other
//! non-success status is `Rejected` carrying the body's `error` text, and
//! connection or decode failures are `Transport`.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;
use charter_core::booking::{BookingReference, NewBooking};
use charter_core::delivery::TicketDelivery;
use charter_core::repository::{BookingRepository, FlightRepository, PassengerDirectory, PriceLookup};
use charter_core::requests::{CancelFlightRequest, ErrorPayload, FlightDraft, RescheduleFlightRequest};
use charter_core::search::PriceLookupResponse;
use charter_core::{RemoteError, RemoteResult};
use charter_shared::{Flight, PassengerSuggestion, TicketDocument};

#[derive(Clone)]
pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CreatedBooking {
    reference: BookingReference,
}

#[derive(Serialize)]
struct DeliveryRequest<'a> {
    recipient: &'a str,
    ticket: &'a TicketDocument,
}

impl RemoteBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorPayload>(&body).ok().and_then(|p| p.error);
        warn!(status = status.as_u16(), "Backing service rejected request");
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        self.send(request).await?.json::<T>().await.map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

#[async_trait]
impl FlightRepository for RemoteBackend {
    async fn list_flights(&self) -> RemoteResult<Vec<Flight>> {
        self.fetch(self.client.get(self.url("/flights"))).await
    }

    async fn get_flight(&self, id: Uuid) -> RemoteResult<Flight> {
        self.fetch(self.client.get(self.url(&format!("/flights/{}", id)))).await
    }

    async fn create_flight(&self, draft: &FlightDraft) -> RemoteResult<Flight> {
        self.fetch(self.client.post(self.url("/flights")).json(draft)).await
    }

    async fn update_flight(&self, id: Uuid, draft: &FlightDraft) -> RemoteResult<Flight> {
        self.fetch(self.client.put(self.url(&format!("/flights/{}", id))).json(draft))
            .await
    }

    async fn cancel_flight(&self, request: &CancelFlightRequest) -> RemoteResult<()> {
        let url = self.url(&format!("/flights/{}/cancel", request.flight_id));
        self.send(self.client.post(url).json(request)).await.map(|_| ())
    }

    async fn reschedule_flight(&self, request: &RescheduleFlightRequest) -> RemoteResult<()> {
        let url = self.url(&format!("/flights/{}/reschedule", request.flight_id));
        self.send(self.client.post(url).json(request)).await.map(|_| ())
    }

    async fn delete_flight(&self, id: Uuid) -> RemoteResult<()> {
        self.send(self.client.delete(self.url(&format!("/flights/{}", id))))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl PriceLookup for RemoteBackend {
    async fn lookup_price(&self, flight_number: &str) -> RemoteResult<PriceLookupResponse> {
        debug!(flight_number, "Looking up flight price");
        let request = self
            .client
            .get(self.url("/flights/price"))
            .query(&[("flight_number", flight_number)]);
        self.fetch(request).await
    }
}

#[async_trait]
impl PassengerDirectory for RemoteBackend {
    async fn search_passengers(&self, partial_name: &str) -> RemoteResult<Vec<PassengerSuggestion>> {
        let request = self
            .client
            .get(self.url("/passengers/search"))
            .query(&[("q", partial_name)]);
        self.fetch(request).await
    }
}

#[async_trait]
impl BookingRepository for RemoteBackend {
    async fn create_booking(&self, booking: &NewBooking) -> RemoteResult<BookingReference> {
        let created: CreatedBooking = self
            .fetch(self.client.post(self.url("/bookings")).json(booking))
            .await?;
        Ok(created.reference)
    }
}

#[async_trait]
impl TicketDelivery for RemoteBackend {
    async fn deliver(&self, ticket: &TicketDocument, recipient: &str) -> RemoteResult<()> {
        let body = DeliveryRequest { recipient, ticket };
        self.send(self.client.post(self.url("/tickets/deliver")).json(&body))
            .await
            .map(|_| ())
    }
}
