//! Mock admin backend for tests.
//!
//! Serves the fixed admin endpoints on an ephemeral local port and records
//! every request it sees.

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Token issued for the valid credentials
pub const TEST_TOKEN: &str = "abc123";
/// Token the backend always rejects on resource calls
pub const EXPIRED_TOKEN: &str = "expired";
/// Token whose resource calls answer only after [`SLOW_DELAY`]
pub const SLOW_TOKEN: &str = "slow";
/// Response delay for [`SLOW_TOKEN`]
pub const SLOW_DELAY: Duration = Duration::from_millis(200);
/// Username whose login succeeds without issuing a token
pub const NO_TOKEN_USER: &str = "notoken";
/// Username whose login fails with a server error
pub const BROKEN_USER: &str = "broken";

/// A request seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

pub struct MockBackend {
    pub base_url: String,
    requests: Recorder,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let requests = Recorder::default();

        let app = Router::new()
            .route("/admin/auth", post(auth))
            .route("/admin/:resource", get(resource))
            .with_state(requests.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    /// Requests recorded for `path`, in arrival order
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn auth(
    State(requests): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    requests.lock().unwrap().push(RecordedRequest {
        path: "/admin/auth".to_string(),
        authorization: authorization(&headers),
        body: body.clone(),
    });

    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("admin"), Some("rimac2024")) => (
            StatusCode::OK,
            Json(json!({ "token": TEST_TOKEN, "expiresIn": "24h" })),
        ),
        (Some(NO_TOKEN_USER), _) => (StatusCode::OK, Json(json!({ "success": true }))),
        (Some(BROKEN_USER), _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Database down" })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        ),
    }
}

async fn resource(
    State(requests): State<Recorder>,
    Path(resource): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let auth = authorization(&headers);
    requests.lock().unwrap().push(RecordedRequest {
        path: format!("/admin/{}", resource),
        authorization: auth.clone(),
        body: Value::Null,
    });

    if auth.as_deref() == Some(&format!("Bearer {}", EXPIRED_TOKEN)[..]) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        );
    }
    if auth.as_deref() == Some(&format!("Bearer {}", SLOW_TOKEN)[..]) {
        tokio::time::sleep(SLOW_DELAY).await;
    }

    let body = match resource.as_str() {
        "stats" => stats_fixture(),
        "appointments" => appointments_fixture(),
        "medics" => medics_fixture(),
        "centers" => centers_fixture(),
        "specialties" => specialties_fixture(),
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))),
    };
    (StatusCode::OK, Json(body))
}

pub fn stats_fixture() -> Value {
    json!({
        "success": true,
        "data": {
            "overview": {
                "totalAppointments": 42,
                "successRate": 95,
                "pendingAppointments": 10,
                "confirmedAppointments": 12,
                "completedAppointments": 20
            },
            "rds": {
                "pe": 30,
                "cl": 12,
                "byStatus": { "pending": 10, "confirmed": 12, "completed": 20 }
            },
            "performance": {
                "systemHealth": "healthy",
                "avgProcessingTime": "120ms",
                "lastUpdate": "2024-06-01T10:30:00Z"
            }
        }
    })
}

pub fn appointments_fixture() -> Value {
    json!({
        "success": true,
        "data": {
            "summary": { "totalRDS": 2, "byCountry": { "PE": 1, "CL": 1 } },
            "rds": {
                "pe": {
                    "appointments": [{
                        "appointment_id": "4f1c2a9e-7b3d-4e11-9a55-0c1d2e3f4a5b",
                        "insured_id": "00012",
                        "country_iso": "PE",
                        "medic_name": "Dra. Ana Torres",
                        "specialty_name": "Cardiología",
                        "center_name": "Clínica San Borja",
                        "status": "confirmed",
                        "appointment_date": "2024-06-03T15:00:00Z"
                    }]
                },
                "cl": {
                    "appointments": [{
                        "appointment_id": "short-id",
                        "insured_id": "00099",
                        "country_iso": "CL",
                        "medic_name": "Dr. Pablo Rojas",
                        "specialty_name": "Pediatría",
                        "center_name": "Centro Providencia",
                        "status": "pending",
                        "appointment_date": "2024-06-04T09:30:00Z"
                    }]
                }
            }
        }
    })
}

pub fn medics_fixture() -> Value {
    json!({
        "success": true,
        "data": {
            "summary": { "totalMedics": 2, "byCountry": { "PE": 1, "CL": 1 } },
            "pe": [{
                "medic_id": 1,
                "name": "Dra. Ana Torres",
                "specialty_id": 3,
                "specialty_name": "Cardiología",
                "center_id": 7,
                "center_name": "Clínica San Borja",
                "center_address": "Av. Guardia Civil 337",
                "center_city": "Lima"
            }],
            "cl": [{
                "medic_id": 2,
                "name": "Dr. Pablo Rojas",
                "specialty_id": 5,
                "specialty_name": "Pediatría",
                "center_id": 9,
                "center_name": "Centro Providencia",
                "center_address": "Av. Providencia 1234",
                "center_city": "Santiago"
            }]
        }
    })
}

pub fn centers_fixture() -> Value {
    json!({ "success": true, "data": [{ "center_id": 7, "name": "Clínica San Borja" }] })
}

pub fn specialties_fixture() -> Value {
    json!({ "success": true, "data": [{ "specialty_id": 3, "name": "Cardiología" }] })
}
