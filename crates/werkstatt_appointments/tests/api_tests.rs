use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use werkstatt_appointments::{
    routes, AdminAuthState, AdminQueryService, AppointmentService, AppointmentsState,
};
use werkstatt_common::models::{Attendee, RemoteCalendarEvent, ResponseStatus};
use werkstatt_common::testing::{InMemoryCalendarService, RecordingMailer};
use werkstatt_config::AppConfig;
use werkstatt_store::{AppointmentRepository, JsonFileRepository};

const TOKEN: &str = "s3cret-admin-token";

struct TestApp {
    router: Router,
    calendar: Arc<InMemoryCalendarService>,
    repository: Arc<JsonFileRepository>,
    mailer: Arc<RecordingMailer>,
    _dir: tempfile::TempDir,
}

fn app(token: Option<&str>, events: Vec<RemoteCalendarEvent>) -> TestApp {
    let mut config = AppConfig::default();
    config.shop.name = "Autohaus Müller".to_string();
    config.shop.email = "werkstatt@example.com".to_string();
    let config = Arc::new(config);

    let dir = tempfile::tempdir().unwrap();
    let calendar = Arc::new(InMemoryCalendarService::with_events(events));
    let repository = Arc::new(JsonFileRepository::new(dir.path().join("appointments.json")));
    let mailer = Arc::new(RecordingMailer::new());

    let state = Arc::new(AppointmentsState {
        booking: Arc::new(AppointmentService::new(
            config.clone(),
            calendar.clone(),
            repository.clone(),
            mailer.clone(),
        )),
        admin: Arc::new(AdminQueryService::new(
            config,
            calendar.clone(),
            repository.clone(),
        )),
    });
    let auth = Arc::new(AdminAuthState::new(token.map(str::to_string)));

    TestApp {
        router: routes(state, auth),
        calendar,
        repository,
        mailer,
        _dir: dir,
    }
}

fn upcoming_event(id: &str) -> RemoteCalendarEvent {
    let start = Utc::now() + Duration::days(1);
    RemoteCalendarEvent {
        id: id.to_string(),
        summary: Some("Autohaus Müller: Inspektion – Erika".to_string()),
        description: Some("Kunde: Erika".to_string()),
        start: Some(start.to_rfc3339()),
        end: Some((start + Duration::hours(1)).to_rfc3339()),
        all_day: false,
        attendees: vec![Attendee {
            email: "werkstatt@example.com".to_string(),
            response_status: ResponseStatus::NeedsAction,
        }],
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn json_request(method: Method, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_booking_is_public_even_with_admin_token() {
    let app = app(Some(TOKEN), vec![]);

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/appointments",
            json!({
                "name": "Max Mustermann",
                "email": "max@example.com",
                "service": "Reifenwechsel",
                "start_iso": "2030-03-10T09:00:00+01:00",
                "end_iso": "2030-03-10T10:00:00+01:00"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["gcal_event_id"], "evt_1");
    assert!(body["id"].as_str().unwrap().starts_with("apt_"));
    assert_eq!(app.repository.find_all().await.unwrap().len(), 1);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_booking_with_missing_fields_is_400() {
    let app = app(None, vec![]);

    let (status, body) = send(
        &app.router,
        json_request(Method::POST, "/appointments", json!({"name": "Max"}), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Pflichtfelder fehlen: email, start_iso, end_iso");
    assert!(app.repository.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_400_with_error_body() {
    let app = app(None, vec![]);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/appointments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_admin_routes_require_token_when_configured() {
    let app = app(Some(TOKEN), vec![upcoming_event("evt_1")]);

    let (status, body) = send(&app.router, empty_request(Method::GET, "/appointments", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app.router,
        empty_request(Method::GET, "/appointments", Some("wrong-token")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app.router,
        empty_request(Method::DELETE, "/appointments/evt_1", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.calendar.events().len(), 1);

    let (status, body) = send(
        &app.router,
        empty_request(Method::GET, "/appointments", Some(TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["id"], "evt_1");
    assert_eq!(body["events"][0]["status"], "needsAction");
}

#[tokio::test]
async fn test_admin_routes_open_without_token() {
    let app = app(None, vec![upcoming_event("evt_1")]);

    let (status, body) = send(&app.router, empty_request(Method::GET, "/appointments", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_status_patch_then_list_shows_accepted() {
    let app = app(Some(TOKEN), vec![upcoming_event("evt_1")]);

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PATCH,
            "/appointments/evt_1/status",
            json!({"status": "confirmed"}),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, body) = send(
        &app.router,
        empty_request(Method::GET, "/appointments", Some(TOKEN)),
    )
    .await;
    assert_eq!(body["events"][0]["status"], "accepted");
}

#[tokio::test]
async fn test_status_patch_validation_and_not_found() {
    let app = app(None, vec![upcoming_event("evt_1")]);

    let (status, body) = send(
        &app.router,
        json_request(Method::PATCH, "/appointments/evt_1/status", json!({}), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Fehlende Parameter");

    let (status, _) = send(
        &app.router,
        json_request(
            Method::PATCH,
            "/appointments/evt_1/status",
            json!({"status": "vielleicht"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        json_request(
            Method::PATCH,
            "/appointments/evt_missing/status",
            json!({"status": "declined"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_flow() {
    let app = app(None, vec![]);

    let (_, booked) = send(
        &app.router,
        json_request(
            Method::POST,
            "/appointments",
            json!({
                "name": "Erika",
                "email": "erika@example.com",
                "start_iso": "2030-05-01T08:00",
                "end_iso": "2030-05-01T09:00"
            }),
            None,
        ),
    )
    .await;
    let event_id = booked["gcal_event_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        empty_request(Method::DELETE, &format!("/appointments/{}", event_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(app.calendar.events().is_empty());
    assert!(app.repository.find_all().await.unwrap().is_empty());

    let (status, body) = send(
        &app.router,
        empty_request(Method::DELETE, &format!("/appointments/{}", event_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
