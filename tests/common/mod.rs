// SPDX-License-Identifier: MIT

use patient_registry::config::Config;
use patient_registry::db::FirestoreDb;
use patient_registry::routes::create_router;
use patient_registry::services::{AddressResolver, GeocodingClient};
use patient_registry::AppState;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Geocoding client pointed at an unroutable endpoint. Any request through
/// it fails fast, so tests can assert the geocoder was never needed.
#[allow(dead_code)]
pub fn unreachable_geocoder() -> GeocodingClient {
    GeocodingClient::with_base_url(
        "test_key".to_string(),
        "http://127.0.0.1:9/v1/geocode/search".to_string(),
    )
}

/// In-process geocoding endpoint serving canned responses in order.
#[allow(dead_code)]
pub struct GeocoderStub {
    /// Base URL to hand to `GeocodingClient::with_base_url`.
    pub base_url: String,
    /// The `text` query parameter of every request received, in order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

/// Spawn a local geocoding stub on an ephemeral port.
///
/// Each request pops the next canned response body; once the queue is
/// drained an empty feature list is served. Requests are recorded so tests
/// can assert how many calls were made and with which query text.
#[allow(dead_code)]
pub async fn spawn_geocoder_stub(responses: Vec<serde_json::Value>) -> GeocoderStub {
    use axum::{extract::Query, routing::get, Json, Router};

    let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue: Arc<Mutex<VecDeque<serde_json::Value>>> =
        Arc::new(Mutex::new(VecDeque::from(responses)));

    let seen = requests.clone();
    let app = Router::new().route(
        "/v1/geocode/search",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            let queue = queue.clone();
            async move {
                seen.lock()
                    .unwrap()
                    .push(params.get("text").cloned().unwrap_or_default());
                let body = queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| serde_json::json!({ "features": [] }));
                Json(body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    GeocoderStub {
        base_url: format!("http://{}/v1/geocode/search", addr),
        requests,
    }
}

/// Canned single-feature response at the given GeoJSON `[lng, lat]`.
#[allow(dead_code)]
pub fn geocoder_feature(lng: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "features": [{ "geometry": { "coordinates": [lng, lat] } }]
    })
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let resolver = AddressResolver::new(db.clone(), unreachable_geocoder());

    let state = Arc::new(AppState {
        config,
        db,
        resolver,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT token for a username.
#[allow(dead_code)]
pub fn create_test_jwt(username: &str, signing_key: &[u8]) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: username.to_string(),
        exp: now + 86400,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .expect("Failed to create JWT")
}
