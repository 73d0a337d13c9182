use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use charter_api::{
    app,
    middleware::issue_token,
    state::{AppState, AuthConfig, Backend, Settings},
};
use charter_catalog::OperationalClock;
use charter_core::identity::{Actor, Role};
use charter_offer::{ResolverConfig, SuggestionConfig};
use charter_order::{CompanyProfile, LifecycleConfig};
use charter_store::InMemoryBackend;

const SECRET: &str = "integration-secret";

fn test_app() -> Router {
    let settings = Settings {
        auth: AuthConfig { secret: SECRET.to_string() },
        lifecycle: LifecycleConfig::default(),
        resolver: ResolverConfig::default(),
        suggestions: SuggestionConfig::default(),
        clock: OperationalClock::default(),
        company: CompanyProfile {
            name: "Test Charters".to_string(),
            support_phone: "+509 0000 0000".to_string(),
            support_email: "ops@example.com".to_string(),
        },
    };
    let backend = Backend::shared(Arc::new(InMemoryBackend::seeded()));
    app(AppState::new(backend, settings))
}

fn token(role: Role) -> String {
    let actor = Actor {
        id: format!("{:?}-1", role).to_lowercase(),
        email: None,
        role,
    };
    issue_token(SECRET, &actor, Duration::hours(1)).unwrap()
}

async fn call(app: &Router, method: Method, uri: &str, bearer: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn flight_id(app: &Router, number: &str) -> String {
    let (status, flights) = call(app, Method::GET, "/v1/flights", None, None).await;
    assert_eq!(status, StatusCode::OK);
    flights
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["flight_number"] == number)
        .map(|f| f["id"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_quote_in_local_currency() {
    let app = test_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes",
        None,
        Some(json!({
            "outbound_fare": 189.0,
            "payment": { "method": "cash", "settlement": { "currency": "HTG", "exchange_rate": 135.0 } }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"], "25515.00 HTG");
    assert_eq!(body["currency"], "HTG");
}

#[tokio::test]
async fn test_round_trip_quote_adds_return_leg() {
    let app = test_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes",
        None,
        Some(json!({
            "outbound_fare": 189.0,
            "round_trip": true,
            "return_leg": { "amount": 150.0, "currency": "USD" },
            "payment": { "method": "card" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"], "339.00 USD");
}

#[tokio::test]
async fn test_quote_rejects_negative_return_fare() {
    let app = test_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes",
        None,
        Some(json!({
            "outbound_fare": 189.0,
            "round_trip": true,
            "return_leg": { "amount": -150.0, "currency": "USD" },
            "payment": { "method": "card" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Return fare must be a non-negative amount");
}

#[tokio::test]
async fn test_quote_refuses_local_leg_without_rate() {
    let app = test_app();
    let htg_leg = json!({ "amount": 20000.0, "currency": "HTG" });
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes",
        None,
        Some(json!({
            "outbound_fare": 100.0,
            "round_trip": true,
            "return_leg": htg_leg,
            "payment": { "method": "card" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("exchange rate"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes",
        None,
        Some(json!({
            "outbound_fare": 100.0,
            "round_trip": true,
            "return_leg": htg_leg,
            "payment": { "method": "cash", "settlement": { "currency": "HTG", "exchange_rate": 130.0 } }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"], "33000.00 HTG");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = test_app();
    let (status, _) = call(&app, Method::GET, "/v1/admin/flights", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/v1/admin/flights", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, flights) = call(&app, Method::GET, "/v1/admin/flights", Some(&token(Role::Admin)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flights.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_agent_cannot_cancel() {
    let app = test_app();
    let id = flight_id(&app, "HC204").await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/v1/admin/flights/{}/cancel", id),
        Some(&token(Role::Agent)),
        Some(json!({ "note": "Weather" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("administrators"));
}

#[tokio::test]
async fn test_cancel_requires_note_then_hides_flight() {
    let app = test_app();
    let admin = token(Role::Admin);
    let id = flight_id(&app, "HC204").await;
    let uri = format!("/v1/admin/flights/{}/cancel", id);

    let (status, _) = call(&app, Method::POST, &uri, Some(&admin), Some(json!({ "note": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, flights) = call(&app, Method::POST, &uri, Some(&admin), Some(json!({ "note": "Weather at Jacmel" }))).await;
    assert_eq!(status, StatusCode::OK);
    let cancelled = flights
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == id.as_str())
        .unwrap();
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["cancellation_note"], "Weather at Jacmel");

    let (_, public) = call(&app, Method::GET, "/v1/flights", None, None).await;
    assert!(public.as_array().unwrap().iter().all(|f| f["id"] != id.as_str()));

    // Cancelled flights are frozen
    let (status, _) = call(&app, Method::POST, &uri, Some(&admin), Some(json!({ "note": "Again" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reschedule_rejects_inverted_window() {
    let app = test_app();
    let admin = token(Role::Admin);
    let id = flight_id(&app, "PL310").await;
    let uri = format!("/v1/admin/flights/{}/reschedule", id);
    let departure = Utc::now() + Duration::days(6);

    let (status, body) = call(
        &app,
        Method::POST,
        &uri,
        Some(&admin),
        Some(json!({ "departure": departure, "arrival": departure })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let arrival = departure + Duration::minutes(50);
    let (status, flights) = call(
        &app,
        Method::POST,
        &uri,
        Some(&admin),
        Some(json!({ "departure": departure, "arrival": arrival })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let moved = flights
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["id"] == id.as_str())
        .unwrap();
    assert_eq!(moved["status"], "RESCHEDULED");
}

#[tokio::test]
async fn test_delete_removes_flight() {
    let app = test_app();
    let admin = token(Role::Admin);
    let id = flight_id(&app, "HC205").await;

    let (status, _) = call(&app, Method::DELETE, &format!("/v1/admin/flights/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, flights) = call(&app, Method::GET, "/v1/admin/flights", Some(&admin), None).await;
    assert!(flights.as_array().unwrap().iter().all(|f| f["id"] != id.as_str()));

    let (status, _) = call(&app, Method::DELETE, &format!("/v1/admin/flights/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
