use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use bookdesk::config::{AppConfig, CalendarConfig, StorageBackend};
use bookdesk::db::{BookingRepository, MemoryStore};
use bookdesk::handlers;
use bookdesk::models::Catalog;
use bookdesk::services::calendar::{
    CalendarClient, CalendarError, CalendarEvent, CalendarMirror, CreatedEvent, TokenProvider,
};
use bookdesk::services::desk::BookingDesk;
use bookdesk::services::manager::BookingManager;
use bookdesk::state::AppState;

// ── Mock Providers ──

struct MockTokens {
    deny: bool,
}

#[async_trait]
impl TokenProvider for MockTokens {
    async fn access_token(&self) -> Result<String, CalendarError> {
        if self.deny {
            Err(CalendarError::Auth("invalid_grant".to_string()))
        } else {
            Ok("test-token".to_string())
        }
    }
}

#[derive(Clone, Default)]
struct MockCalendar {
    inserted: Arc<Mutex<Vec<(String, CalendarEvent)>>>,
}

#[async_trait]
impl CalendarClient for MockCalendar {
    async fn insert_event(
        &self,
        calendar_id: &str,
        _access_token: &str,
        event: &CalendarEvent,
    ) -> Result<CreatedEvent, CalendarError> {
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push((calendar_id.to_string(), event.clone()));
        Ok(CreatedEvent {
            id: format!("evt-{}", inserted.len()),
            html_link: None,
            status: Some("confirmed".to_string()),
        })
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        bind_addr: "127.0.0.1".to_string(),
        storage_backend: StorageBackend::Memory,
        storage_path: String::new(),
        catalog_path: None,
        business_name: "Test Desk".to_string(),
        enforce_availability: true,
        export_dir: None,
        calendar: CalendarConfig {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            access_token: String::new(),
            api_base: "http://localhost".to_string(),
            salon_calendar_id: "salon".to_string(),
            hotel_calendar_id: "hotel".to_string(),
            timezone: "Asia/Kolkata".to_string(),
        },
    }
}

fn test_mirror(deny: bool, calendar: MockCalendar) -> CalendarMirror {
    CalendarMirror::new(
        Box::new(MockTokens { deny }),
        Box::new(calendar),
        "salon".to_string(),
        "hotel".to_string(),
        chrono_tz::Asia::Kolkata,
        "₹".to_string(),
    )
}

fn test_state(mirror: Option<CalendarMirror>) -> Arc<AppState> {
    let manager = BookingManager::new(
        BookingRepository::new(Box::new(MemoryStore::new())),
        Catalog::default(),
    );
    Arc::new(AppState {
        config: test_config(),
        desk: BookingDesk::new(manager, mirror),
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = test_app(state.clone()).oneshot(request).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(
        state,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(
    state: &Arc<AppState>,
    uri: &str,
    json: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(
        state,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Monday 2030-01-07, inside salon hours.
fn salon_request(time: &str, service_id: u32) -> serde_json::Value {
    serde_json::json!({
        "type": "salon",
        "serviceId": service_id,
        "date": "2030-01-07",
        "time": time,
        "customerName": "Priya Shah",
        "customerEmail": "priya@example.com",
        "customerPhone": "+919876543210",
        "specialRequests": "Window seat"
    })
}

fn hotel_request(check_in_offset: i64, check_out_offset: i64, room_id: u32) -> serde_json::Value {
    let today = Utc::now().date_naive();
    serde_json::json!({
        "type": "hotel",
        "roomId": room_id,
        "checkInDate": (today + Duration::days(check_in_offset)).to_string(),
        "checkOutDate": (today + Duration::days(check_out_offset)).to_string(),
        "guests": 2,
        "customerName": "Arjun Rao",
        "customerEmail": "arjun@example.com",
        "customerPhone": "+919812345678"
    })
}

// ── Health & Catalog ──

#[tokio::test]
async fn test_health() {
    let state = test_state(None);
    let (status, json) = get_json(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_catalog_and_storefront() {
    let state = test_state(None);

    let (status, json) = get_json(&state, "/api/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["salonServices"].as_array().unwrap().len(), 8);
    assert_eq!(json["hotelRooms"].as_array().unwrap().len(), 5);
    assert_eq!(json["currencySymbol"], "₹");

    let (status, json) = get_json(&state, "/api/storefront").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 13);
}

// ── Bookings ──

#[tokio::test]
async fn test_submit_and_fetch_salon_booking() {
    let state = test_state(None);

    let (status, json) = post_json(&state, "/api/bookings", salon_request("10:00", 1)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["calendar"]["state"], "skipped");
    let booking = &json["booking"];
    assert_eq!(booking["type"], "salon");
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["time"], "10:00");
    assert_eq!(booking["service"]["name"], "Haircut & Style");
    let id = booking["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("BK"));

    let (status, fetched) = get_json(&state, &format!("/api/bookings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["customerName"], "Priya Shah");
    assert_eq!(fetched["specialRequests"], "Window seat");

    let (_, list) = get_json(&state, "/api/bookings").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_overlapping_salon_booking_conflicts() {
    let state = test_state(None);

    let (status, _) = post_json(&state, "/api/bookings", salon_request("10:00", 1)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post_json(&state, "/api/bookings", salon_request("10:30", 4)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("already booked"));

    // back-to-back is fine
    let (status, _) = post_json(&state, "/api/bookings", salon_request("11:00", 4)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_hotel_booking_and_room_availability() {
    let state = test_state(None);

    let (status, json) = post_json(&state, "/api/bookings", hotel_request(10, 12, 2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["booking"]["nights"], 2);
    assert_eq!(json["booking"]["totalPrice"], 7000);

    let today = Utc::now().date_naive();
    let day = |n: i64| (today + Duration::days(n)).to_string();

    let (_, json) = get_json(
        &state,
        &format!("/api/availability/hotel?checkIn={}&checkOut={}&roomId=2", day(12), day(14)),
    )
    .await;
    assert_eq!(json["available"], true);

    let (_, json) = get_json(
        &state,
        &format!("/api/availability/hotel?checkIn={}&checkOut={}&roomId=2", day(11), day(13)),
    )
    .await;
    assert_eq!(json["available"], false);

    let (_, json) = get_json(
        &state,
        &format!("/api/availability/hotel?checkIn={}&checkOut={}&roomId=3", day(11), day(13)),
    )
    .await;
    assert_eq!(json["available"], true);
}

#[tokio::test]
async fn test_invalid_payloads_are_bad_requests() {
    let state = test_state(None);

    let (status, json) = post_json(&state, "/api/bookings", salon_request("25:99", 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("invalid input"));

    let mut missing_email = salon_request("10:00", 1);
    missing_email["customerEmail"] = serde_json::json!("");
    let (status, _) = post_json(&state, "/api/bookings", missing_email).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&state, "/api/bookings", hotel_request(5, 5, 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = get_json(&state, "/api/bookings").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let state = test_state(None);

    let (status, json) = get_json(&state, "/api/bookings/BKNOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());

    let (status, _) = post_json(
        &state,
        "/api/bookings/BKNOPE/status",
        serde_json::json!({"status": "confirmed"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_lifecycle() {
    let state = test_state(None);

    let (_, json) = post_json(&state, "/api/bookings", salon_request("14:00", 5)).await;
    let id = json["booking"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/bookings/{id}/status");

    let (status, json) = post_json(&state, &uri, serde_json::json!({"status": "confirmed"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "confirmed");
    assert!(json["updatedAt"].is_string());

    let (status, _) = post_json(&state, &uri, serde_json::json!({"status": "pending"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(&state, &uri, serde_json::json!({"status": "archived"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_json(&state, &uri, serde_json::json!({"status": "cancelled"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "cancelled");

    // a cancelled booking frees its slot
    let (_, json) = get_json(
        &state,
        "/api/availability/salon?date=2030-01-07&time=14:00&serviceId=5",
    )
    .await;
    assert_eq!(json["available"], true);
}

// ── Availability ──

#[tokio::test]
async fn test_salon_availability_and_slots() {
    let state = test_state(None);
    post_json(&state, "/api/bookings", salon_request("10:00", 1)).await;

    let (_, json) = get_json(
        &state,
        "/api/availability/salon?date=2030-01-07&time=09:30&duration=60",
    )
    .await;
    assert_eq!(json["available"], false);

    let (_, json) = get_json(
        &state,
        "/api/availability/salon?date=2030-01-07&time=09:00&serviceId=1",
    )
    .await;
    assert_eq!(json["available"], true);

    let (status, _) = get_json(&state, "/api/availability/salon?date=2030-01-07&time=09:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(
        &state,
        "/api/availability/salon?date=2030-01-07&time=9am&duration=30",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get_json(
        &state,
        "/api/availability/salon/slots?date=2030-01-07&serviceId=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let slots: Vec<&str> = json["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert!(slots.contains(&"09:00"));
    assert!(slots.contains(&"11:00"));
    assert!(!slots.contains(&"09:30"));
    assert!(!slots.contains(&"10:00"));
    assert!(!slots.contains(&"18:30"));
}

// ── Export & .ics ──

#[tokio::test]
async fn test_export_is_dated_attachment() {
    let state = test_state(None);
    post_json(&state, "/api/bookings", salon_request("12:00", 7)).await;

    let res = test_app(state)
        .oneshot(
            Request::builder()
                .uri("/api/bookings/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let expected = format!("bookings_{}.json", Utc::now().format("%Y-%m-%d"));
    assert!(disposition.contains(&expected));

    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(json.len(), 1);
    assert_eq!(json[0]["service"]["name"], "Eyebrow Threading");
}

#[tokio::test]
async fn test_download_ics() {
    let state = test_state(None);
    let (_, json) = post_json(&state, "/api/bookings", salon_request("15:00", 2)).await;
    let id = json["booking"]["id"].as_str().unwrap().to_string();

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .uri(format!("/api/bookings/{id}/ics"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/calendar; charset=utf-8"
    );

    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let ics = String::from_utf8(body.to_vec()).unwrap();
    assert!(ics.contains("DTSTART:20300107T150000"));
    assert!(ics.contains("DTEND:20300107T170000"));
    assert!(ics.contains("SUMMARY:Hair Color - Priya Shah (Test Desk)"));

    let (status, _) = send(
        &state,
        Request::builder()
            .uri("/api/bookings/BKNOPE/ics")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Calendar mirror ──

#[tokio::test]
async fn test_submit_mirrors_to_calendar() {
    let calendar = MockCalendar::default();
    let state = test_state(Some(test_mirror(false, calendar.clone())));

    let (status, json) = post_json(&state, "/api/bookings", salon_request("16:00", 3)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["calendar"]["state"], "synced");
    assert_eq!(json["calendar"]["eventId"], "evt-1");

    let (_, json) = post_json(&state, "/api/bookings", hotel_request(3, 4, 1)).await;
    assert_eq!(json["calendar"]["state"], "synced");

    let inserted = calendar.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].0, "salon");
    assert_eq!(inserted[0].1.summary, "Facial Treatment - Priya Shah");
    assert_eq!(
        inserted[0].1.start.date_time.as_deref(),
        Some("2030-01-07T16:00:00+05:30")
    );
    assert_eq!(inserted[1].0, "hotel");
    assert!(inserted[1].1.start.date.is_some());
}

#[tokio::test]
async fn test_mirror_failure_keeps_booking_pending() {
    let calendar = MockCalendar::default();
    let state = test_state(Some(test_mirror(true, calendar.clone())));

    let (status, json) = post_json(&state, "/api/bookings", salon_request("17:00", 4)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["calendar"]["state"], "failed");
    assert!(json["calendar"]["warning"]
        .as_str()
        .unwrap()
        .contains("invalid_grant"));
    assert!(calendar.inserted.lock().unwrap().is_empty());

    let id = json["booking"]["id"].as_str().unwrap().to_string();
    let (status, stored) = get_json(&state, &format!("/api/bookings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["status"], "pending");
}
